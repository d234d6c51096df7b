pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;
pub mod jobs;

use crate::app::auth::TokenVerifier;
use crate::app::engagement::EngagementFacade;
use crate::infra::cache::RedisCache;

#[derive(Clone)]
pub struct AppState {
    pub engagement: EngagementFacade,
    pub tokens: TokenVerifier,
    pub cache: Option<RedisCache>,
    pub admin_token: Option<String>,
}
