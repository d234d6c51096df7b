use axum::Router;

use crate::AppState;

mod auth;
mod error;
mod handlers;
mod routes;

pub use auth::{AdminToken, AuthUser};
pub use error::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health())
        .merge(routes::threads())
        .merge(routes::comments())
        .merge(routes::reports())
        .merge(routes::feed())
        .merge(routes::users())
        .with_state(state)
}
