pub mod cache;
pub mod db;
pub mod memory;
pub mod notification_sink;
pub mod pg_store;
pub mod store;
