pub mod engagement;
pub mod feed;
pub mod moderation;
pub mod notification;
pub mod thread;
