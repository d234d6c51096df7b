use anyhow::Result;
use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use tracing::warn;

/// String key/value cache with per-key expiry. Failures are logged and read
/// as misses; a cache outage never fails a request.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, payload: String, ttl_seconds: u64);
    async fn delete(&self, key: &str);
}

#[derive(Clone)]
pub struct RedisCache {
    client: Client,
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url)?;
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(Self { client })
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.client.get_multiplexed_async_connection().await.ok()?;
        conn.get::<_, Option<String>>(key).await.ok()?
    }

    async fn set(&self, key: &str, payload: String, ttl_seconds: u64) {
        match self.client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                if let Err(err) = conn.set_ex::<_, _, ()>(key, payload, ttl_seconds).await {
                    warn!(error = ?err, key, "failed to write cache");
                }
            }
            Err(err) => warn!(error = ?err, "failed to connect to cache"),
        }
    }

    async fn delete(&self, key: &str) {
        if let Ok(mut conn) = self.client.get_multiplexed_async_connection().await {
            if let Err(err) = conn.del::<_, ()>(key).await {
                warn!(error = ?err, key, "failed to delete cache key");
            }
        }
    }
}
