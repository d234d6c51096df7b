use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub database: DatabaseConfig,
    pub run_migrations: bool,
    pub migrations_dir: String,
    pub redis_url: Option<String>,
    pub feed_cache_ttl_seconds: u64,
    pub trending_window_days: i64,
    pub notification_queue_capacity: usize,
    pub admin_token: Option<String>,
    pub paseto_access_key: [u8; 32],
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        let trending_window_days: i64 = env_or_parse("TRENDING_WINDOW_DAYS", "7")?;
        if trending_window_days <= 0 {
            return Err(anyhow!("invalid TRENDING_WINDOW_DAYS: must be positive"));
        }

        Ok(Self {
            http_addr,
            database: DatabaseConfig {
                url: env_or_err("DATABASE_URL")?,
                max_connections: env_or_parse("DB_MAX_CONNECTIONS", "25")?,
                connect_timeout_seconds: env_or_parse("DB_CONNECT_TIMEOUT_SECONDS", "5")?,
                idle_timeout_seconds: env_or_parse("DB_IDLE_TIMEOUT_SECONDS", "300")?,
                max_lifetime_seconds: env_or_parse("DB_MAX_LIFETIME_SECONDS", "1800")?,
            },
            run_migrations: env_or_parse("RUN_MIGRATIONS", "false")?,
            migrations_dir: env_or("MIGRATIONS_DIR", "migrations"),
            redis_url: std::env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            feed_cache_ttl_seconds: env_or_parse("FEED_CACHE_TTL_SECONDS", "30")?,
            trending_window_days,
            notification_queue_capacity: env_or_parse("NOTIFICATION_QUEUE_CAPACITY", "1024")?,
            admin_token: std::env::var("ADMIN_TOKEN").ok(),
            paseto_access_key: env_key_32("PASETO_ACCESS_KEY")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_err(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("missing required env var: {}", key))
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}

fn env_key_32(key: &str) -> Result<[u8; 32]> {
    let value = env_or_err(key)?;
    decode_key_32(key, &value)
}

fn decode_key_32(key: &str, value: &str) -> Result<[u8; 32]> {
    let decoded = STANDARD
        .decode(value.as_bytes())
        .map_err(|err| anyhow!("invalid {}: {}", key, err))?;
    if decoded.len() != 32 {
        return Err(anyhow!("invalid {}: expected 32 bytes", key));
    }
    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&decoded);
    Ok(key_bytes)
}
