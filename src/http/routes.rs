use axum::{routing::get, routing::post, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn threads() -> Router<AppState> {
    Router::new()
        .route("/threads", post(handlers::create_thread))
        .route(
            "/threads/:id",
            get(handlers::get_thread)
                .patch(handlers::update_thread)
                .delete(handlers::delete_thread),
        )
        .route(
            "/threads/:id/upvote",
            get(handlers::upvote_state)
                .post(handlers::upvote_thread)
                .delete(handlers::undo_upvote),
        )
        .route(
            "/threads/:id/downvote",
            get(handlers::downvote_state)
                .post(handlers::downvote_thread)
                .delete(handlers::undo_downvote),
        )
        .route("/threads/:id/vote", get(handlers::vote_stance))
        .route("/threads/:id/vote/history", get(handlers::vote_history))
        .route(
            "/threads/:id/comments",
            get(handlers::list_thread_comments).post(handlers::add_comment),
        )
        .route(
            "/threads/:id/save",
            post(handlers::save_thread).delete(handlers::unsave_thread),
        )
}

pub fn comments() -> Router<AppState> {
    Router::new()
        .route("/comments/:id", axum::routing::delete(handlers::delete_comment))
        .route(
            "/comments/:id/like",
            post(handlers::like_comment).delete(handlers::unlike_comment),
        )
}

pub fn reports() -> Router<AppState> {
    Router::new()
        .route(
            "/reports",
            get(handlers::list_open_reports).post(handlers::create_report),
        )
        .route("/reports/:id", get(handlers::get_report))
        .route("/reports/:id/resolve", post(handlers::resolve_report))
}

pub fn feed() -> Router<AppState> {
    Router::new()
        .route("/feed/home", get(handlers::home_feed))
        .route("/feed/trending", get(handlers::trending_feed))
        .route("/feed/communities", get(handlers::community_feed))
        .route("/feed/following", get(handlers::following_feed))
        .route("/feed/search", get(handlers::search_feed))
        .route("/feed/saved", get(handlers::saved_feed))
        .route("/feed/refresh", post(handlers::refresh_feed))
}

pub fn users() -> Router<AppState> {
    Router::new().route("/users/:id/threads", get(handlers::list_user_threads))
}
