use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

use crate::config::DatabaseConfig;

#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Applies the pending migrations in `dir`. Applied versions are tracked
    /// in `_sqlx_migrations`, so already-applied files are skipped. Returns the
    /// number of migrations found in `dir`.
    pub async fn run_migrations(&self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let migrator = load_migrator(dir).await?;
        migrator
            .run(&self.pool)
            .await
            .with_context(|| format!("migrations in {} failed", dir.display()))?;
        Ok(migrator.iter().count())
    }
}

async fn load_migrator(dir: &Path) -> Result<Migrator> {
    Migrator::new(dir)
        .await
        .with_context(|| format!("cannot load migrations from {}", dir.display()))
}
