//! Feed Tests
//!
//! Covers the ranking sources (trending, communities, following, search,
//! saved), the merged home feed and the author listing.

mod common;

use axum::http::StatusCode;
use common::app;
use time::{Duration, OffsetDateTime};

use agora::app::error::EngagementError;

// ===========================================================================
// Trending
// ===========================================================================

#[tokio::test]
async fn trending_counts_only_recent_upvotes() {
    let app = app().await;
    let author = app.create_user("author").await;
    let viewer = app.create_user("viewer").await;
    let community = app.create_community().await;

    let mut voters = Vec::new();
    for i in 0..5 {
        voters.push(app.create_user(&format!("voter{}", i)).await);
    }

    let old_favourite = app.create_thread(&author, community, "old favourite").await;
    let fresh = app.create_thread(&author, community, "fresh").await;
    let votes = app.engagement().votes();

    app.store
        .set_clock(Some(OffsetDateTime::now_utc() - Duration::days(8)))
        .await;
    for voter in &voters {
        votes.upvote(old_favourite, voter.id).await.unwrap();
    }
    app.store.set_clock(None).await;
    for voter in voters.iter().take(3) {
        votes.upvote(fresh, voter.id).await.unwrap();
    }

    let resp = app.get("/feed/trending", Some(&viewer.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.thread_ids(), vec![fresh, old_favourite]);
    let items = resp.json()["items"].as_array().unwrap().clone();
    assert_eq!(items[0]["upvote_count"].as_i64().unwrap(), 3);
    assert_eq!(items[1]["upvote_count"].as_i64().unwrap(), 0);

    // Outside trending the all-time count applies.
    let resp = app
        .get(&format!("/users/{}/threads", author.id), Some(&viewer.access_token))
        .await;
    let items = resp.json()["items"].as_array().unwrap().clone();
    let old = items
        .iter()
        .find(|item| item["thread"]["id"].as_i64() == Some(old_favourite))
        .unwrap();
    assert_eq!(old["upvote_count"].as_i64().unwrap(), 5);
}

#[tokio::test]
async fn trending_ties_prefer_newer_threads_and_honour_limit() {
    let app = app().await;
    let author = app.create_user("author").await;
    let community = app.create_community().await;

    let a = app.create_thread(&author, community, "a").await;
    let b = app.create_thread(&author, community, "b").await;
    let c = app.create_thread(&author, community, "c").await;

    let resp = app.get("/feed/trending", Some(&author.access_token)).await;
    assert_eq!(resp.thread_ids(), vec![c, b, a]);

    let resp = app.get("/feed/trending?limit=2", Some(&author.access_token)).await;
    assert_eq!(resp.thread_ids(), vec![c, b]);

    let resp = app.get("/feed/trending?limit=-1", Some(&author.access_token)).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trending_marks_viewer_state() {
    let app = app().await;
    let author = app.create_user("author").await;
    let viewer = app.create_user("viewer").await;
    let community = app.create_community().await;
    let liked = app.create_thread(&author, community, "liked").await;
    let disliked = app.create_thread(&author, community, "disliked").await;

    app.engagement().votes().upvote(liked, viewer.id).await.unwrap();
    app.engagement().votes().downvote(disliked, viewer.id).await.unwrap();
    app.store.follow_user(viewer.id, author.id).await;

    let rows = app.engagement().feed().trending(viewer.id, None).await.unwrap();
    let liked_row = rows.iter().find(|row| row.thread.id == liked).unwrap();
    let disliked_row = rows.iter().find(|row| row.thread.id == disliked).unwrap();

    assert!(liked_row.is_upvoted && !liked_row.is_downvoted);
    assert!(disliked_row.is_downvoted && !disliked_row.is_upvoted);
    assert!(liked_row.is_followed);
    assert!(!liked_row.is_mine);
    assert_eq!(liked_row.author.as_ref().unwrap().name, "author");
}

// ===========================================================================
// Followed communities / users
// ===========================================================================

#[tokio::test]
async fn followed_communities_empty_when_following_none() {
    let app = app().await;
    let author = app.create_user("author").await;
    let viewer = app.create_user("viewer").await;
    let community = app.create_community().await;
    app.create_thread(&author, community, "unseen").await;

    let resp = app.get("/feed/communities", Some(&viewer.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.thread_ids().is_empty());
}

#[tokio::test]
async fn followed_communities_in_insertion_order() {
    let app = app().await;
    let author = app.create_user("author").await;
    let viewer = app.create_user("viewer").await;
    let followed = app.create_community().await;
    let ignored = app.create_community().await;
    app.store.follow_community(viewer.id, followed).await;

    let first = app.create_thread(&author, followed, "first").await;
    app.create_thread(&author, ignored, "elsewhere").await;
    let second = app.create_thread(&author, followed, "second").await;

    let resp = app.get("/feed/communities", Some(&viewer.access_token)).await;
    assert_eq!(resp.thread_ids(), vec![first, second]);
}

#[tokio::test]
async fn followed_users_feed() {
    let app = app().await;
    let followed = app.create_user("followed").await;
    let stranger = app.create_user("stranger").await;
    let viewer = app.create_user("viewer").await;
    let community = app.create_community().await;
    app.store.follow_user(viewer.id, followed.id).await;

    let theirs = app.create_thread(&followed, community, "theirs").await;
    app.create_thread(&stranger, community, "strangers").await;

    let resp = app.get("/feed/following", Some(&viewer.access_token)).await;
    assert_eq!(resp.thread_ids(), vec![theirs]);
    assert!(resp.json()["items"][0]["is_followed"].as_bool().unwrap());
}

// ===========================================================================
// Search
// ===========================================================================

#[tokio::test]
async fn search_dedups_thread_and_comment_matches() {
    let app = app().await;
    let author = app.create_user("author").await;
    let viewer = app.create_user("viewer").await;
    let community = app.create_community().await;

    let both = app.create_thread(&author, community, "Rust tips").await;
    app.create_comment(&author, both, "more rust below").await;
    let comment_only = app.create_thread(&author, community, "misc").await;
    app.create_comment(&viewer, comment_only, "try RUST").await;
    app.create_thread(&author, community, "gardening").await;

    let resp = app.get("/feed/search?q=rust", Some(&viewer.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.thread_ids(), vec![both, comment_only]);
}

#[tokio::test]
async fn search_ignores_deleted_rows() {
    let app = app().await;
    let author = app.create_user("author").await;
    let community = app.create_community().await;

    let deleted_thread = app.create_thread(&author, community, "needle thread").await;
    app.engagement()
        .threads()
        .delete(deleted_thread, author.id)
        .await
        .unwrap();

    let host = app.create_thread(&author, community, "host").await;
    let comment_id = app.create_comment(&author, host, "needle comment").await;
    app.engagement()
        .comments()
        .delete_comment(comment_id)
        .await
        .unwrap();

    let rows = app.engagement().feed().search(author.id, "needle").await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let app = app().await;
    let author = app.create_user("author").await;
    let community = app.create_community().await;
    let percent = app.create_thread(&author, community, "100% done").await;
    app.create_thread(&author, community, "1000 done").await;

    let rows = app.engagement().feed().search(author.id, "0%").await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|row| row.thread.id).collect();
    assert_eq!(ids, vec![percent]);
}

#[tokio::test]
async fn blank_search_is_rejected() {
    let app = app().await;
    let viewer = app.create_user("viewer").await;

    let resp = app.get("/feed/search?q=%20%20", Some(&viewer.access_token)).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let err = app.engagement().feed().search(viewer.id, "").await.unwrap_err();
    assert!(matches!(err, EngagementError::BadParamInput(_)));
}

// ===========================================================================
// Saved / home / author
// ===========================================================================

#[tokio::test]
async fn saved_feed_in_save_order() {
    let app = app().await;
    let author = app.create_user("author").await;
    let reader = app.create_user("reader").await;
    let community = app.create_community().await;
    let older = app.create_thread(&author, community, "older").await;
    let newer = app.create_thread(&author, community, "newer").await;
    let threads = app.engagement().threads();

    threads.save(newer, reader.id).await.unwrap();
    threads.save(older, reader.id).await.unwrap();

    let resp = app.get("/feed/saved", Some(&reader.access_token)).await;
    assert_eq!(resp.thread_ids(), vec![newer, older]);
}

#[tokio::test]
async fn home_feed_merges_without_duplicates() {
    let app = app().await;
    let friend = app.create_user("friend").await;
    let stranger = app.create_user("stranger").await;
    let viewer = app.create_user("viewer").await;
    let followed = app.create_community().await;
    let other = app.create_community().await;
    app.store.follow_community(viewer.id, followed).await;
    app.store.follow_user(viewer.id, friend.id).await;

    let base = OffsetDateTime::now_utc();
    app.store.set_clock(Some(base - Duration::hours(3))).await;
    let in_both = app.create_thread(&friend, followed, "both").await;
    app.store.set_clock(Some(base - Duration::hours(2))).await;
    let community_only = app.create_thread(&stranger, followed, "community").await;
    app.store.set_clock(Some(base - Duration::hours(1))).await;
    let friend_only = app.create_thread(&friend, other, "friend").await;
    app.store.set_clock(None).await;
    app.create_thread(&stranger, other, "unrelated").await;

    let resp = app.get("/feed/home", Some(&viewer.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.thread_ids(), vec![friend_only, community_only, in_both]);
}

#[tokio::test]
async fn author_listing_marks_own_threads() {
    let app = app().await;
    let author = app.create_user("author").await;
    let community = app.create_community().await;
    let first = app.create_thread(&author, community, "first").await;
    let second = app.create_thread(&author, community, "second").await;

    let resp = app
        .get(&format!("/users/{}/threads", author.id), Some(&author.access_token))
        .await;
    assert_eq!(resp.thread_ids(), vec![second, first]);
    assert!(resp.json()["items"][0]["is_mine"].as_bool().unwrap());
}

#[tokio::test]
async fn refresh_without_cache_is_a_no_op() {
    let app = app().await;
    let viewer = app.create_user("viewer").await;
    let resp = app.post("/feed/refresh", Some(&viewer.access_token)).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
}
