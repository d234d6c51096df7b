//! Comment Tests
//!
//! Covers adding, listing and deleting comments, and comment likes.

mod common;

use axum::http::StatusCode;
use common::app;
use serde_json::json;

use agora::app::error::EngagementError;

// ===========================================================================
// Add / list
// ===========================================================================

#[tokio::test]
async fn add_and_list_comments() {
    let app = app().await;
    let author = app.create_user("author").await;
    let commenter = app.create_user("commenter").await;
    let community = app.create_community().await;
    let thread_id = app.create_thread(&author, community, "discuss").await;

    let first = app.create_comment(&commenter, thread_id, "first!").await;
    let second = app.create_comment(&author, thread_id, "  thanks  ").await;

    let resp = app.get(&format!("/threads/{}/comments", thread_id), None).await;
    assert_eq!(resp.status, StatusCode::OK);
    let items = resp.json()["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["comment"]["id"].as_i64().unwrap(), first);
    assert_eq!(items[1]["comment"]["id"].as_i64().unwrap(), second);
    assert_eq!(items[1]["comment"]["body"], "thanks");
    assert_eq!(items[0]["author"]["name"], "commenter");
    assert_eq!(items[0]["like_count"].as_i64().unwrap(), 0);
}

#[tokio::test]
async fn comment_on_missing_thread() {
    let app = app().await;
    let user = app.create_user("user").await;

    let resp = app
        .post_json(
            "/threads/4242/comments",
            json!({ "body": "hello" }),
            Some(&user.access_token),
        )
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error_message(), "thread not found");
}

#[tokio::test]
async fn comment_body_validation() {
    let app = app().await;
    let author = app.create_user("author").await;
    let community = app.create_community().await;
    let thread_id = app.create_thread(&author, community, "validate").await;
    let path = format!("/threads/{}/comments", thread_id);

    let resp = app
        .post_json(&path, json!({ "body": "   " }), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_message(), "comment body is required");

    let resp = app
        .post_json(&path, json!({ "body": "x".repeat(1001) }), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// ===========================================================================
// Delete
// ===========================================================================

#[tokio::test]
async fn delete_own_comment() {
    let app = app().await;
    let author = app.create_user("author").await;
    let community = app.create_community().await;
    let thread_id = app.create_thread(&author, community, "delete").await;
    let comment_id = app.create_comment(&author, thread_id, "oops").await;

    let resp = app
        .delete(&format!("/comments/{}", comment_id), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let resp = app.get(&format!("/threads/{}/comments", thread_id), None).await;
    assert!(resp.json()["items"].as_array().unwrap().is_empty());

    let resp = app
        .delete(&format!("/comments/{}", comment_id), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_someone_elses_comment() {
    let app = app().await;
    let author = app.create_user("author").await;
    let other = app.create_user("other").await;
    let community = app.create_community().await;
    let thread_id = app.create_thread(&author, community, "mine").await;
    let comment_id = app.create_comment(&author, thread_id, "keep").await;

    let resp = app
        .delete(&format!("/comments/{}", comment_id), Some(&other.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_comment_manager_reports_missing_rows() {
    let app = app().await;
    let err = app
        .engagement()
        .comments()
        .delete_comment(777)
        .await
        .unwrap_err();
    assert!(matches!(err, EngagementError::NotFound("comment")));
}

// ===========================================================================
// Likes
// ===========================================================================

#[tokio::test]
async fn like_twice_conflicts() {
    let app = app().await;
    let author = app.create_user("author").await;
    let fan = app.create_user("fan").await;
    let community = app.create_community().await;
    let thread_id = app.create_thread(&author, community, "likes").await;
    let comment_id = app.create_comment(&author, thread_id, "like me").await;
    let path = format!("/comments/{}/like", comment_id);

    let resp = app.post(&path, Some(&fan.access_token)).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app.post(&path, Some(&fan.access_token)).await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(resp.error_message(), "comment already liked");
}

#[tokio::test]
async fn unlike_then_like_again_counts_once() {
    let app = app().await;
    let author = app.create_user("author").await;
    let fan = app.create_user("fan").await;
    let community = app.create_community().await;
    let thread_id = app.create_thread(&author, community, "relike").await;
    let comment_id = app.create_comment(&author, thread_id, "again").await;
    let path = format!("/comments/{}/like", comment_id);

    assert_eq!(app.post(&path, Some(&fan.access_token)).await.status, StatusCode::OK);
    assert_eq!(
        app.delete(&path, Some(&fan.access_token)).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(app.post(&path, Some(&fan.access_token)).await.status, StatusCode::OK);

    let resp = app.get(&format!("/threads/{}/comments", thread_id), None).await;
    assert_eq!(resp.json()["items"][0]["like_count"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn unlike_without_like_is_not_found() {
    let app = app().await;
    let author = app.create_user("author").await;
    let community = app.create_community().await;
    let thread_id = app.create_thread(&author, community, "unliked").await;
    let comment_id = app.create_comment(&author, thread_id, "nobody").await;

    let resp = app
        .delete(&format!("/comments/{}/like", comment_id), Some(&author.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn like_deleted_comment_is_not_found() {
    let app = app().await;
    let author = app.create_user("author").await;
    let fan = app.create_user("fan").await;
    let community = app.create_community().await;
    let thread_id = app.create_thread(&author, community, "deleted").await;
    let comment_id = app.create_comment(&author, thread_id, "bye").await;
    app.engagement()
        .comments()
        .delete_comment(comment_id)
        .await
        .unwrap();

    let resp = app
        .post(&format!("/comments/{}/like", comment_id), Some(&fan.access_token))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}
