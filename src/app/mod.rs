pub mod auth;
pub mod comments;
pub mod engagement;
pub mod error;
pub mod feed;
pub mod notifications;
pub mod reports;
pub mod threads;
pub mod votes;
