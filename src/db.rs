use crate::{config::Config, error::Error};
use anyhow::Result;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use tracing::info;

/// Builds the characters-database pool. Connections are opened lazily, so an
/// unreachable database at startup only surfaces as failed ticks, not as a
/// startup error.
pub fn connect(config: &Config) -> Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect_lazy(&config.database_url())?;
    info!("characters database pool created for {}", config.db_host);
    Ok(pool)
}

/// Counts the characters currently flagged online.
pub async fn online_count(pool: &MySqlPool) -> Result<i64, Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM characters WHERE online = 1")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
