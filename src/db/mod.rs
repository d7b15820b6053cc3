/// Database layer
///
/// Connection pools for the stats store. Production deployments use
/// MySQL; SQLite serves local development and tests.

pub mod mysql;

use crate::{
    config::DatabaseConfig,
    error::{StatsError, StatsResult},
    stats::{MySqlStatsRepository, SqliteStatsRepository, StatsRepository},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, sync::Arc};
use tracing::info;

/// Open the stats store named by `config.url`
pub async fn connect_stats_repository(
    config: &DatabaseConfig,
) -> StatsResult<Arc<dyn StatsRepository>> {
    if config.url.starts_with("mysql:") {
        let pool = mysql::create_pool(config).await?;
        Ok(Arc::new(MySqlStatsRepository::new(pool, config.timeout())))
    } else if config.url.starts_with("sqlite:") {
        let pool = create_sqlite_pool(config).await?;
        Ok(Arc::new(SqliteStatsRepository::new(pool, config.timeout())))
    } else {
        Err(StatsError::Validation(format!(
            "Unsupported database URL scheme: {}",
            config.url.split(':').next().unwrap_or_default()
        )))
    }
}

/// Create a SQLite connection pool
pub async fn create_sqlite_pool(config: &DatabaseConfig) -> StatsResult<SqlitePool> {
    info!("Opening SQLite stats store at {}", config.url);

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .busy_timeout(config.timeout());

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.timeout())
        .connect_with(options)
        .await?;

    test_connection(&pool).await?;

    Ok(pool)
}

/// Test database connection
pub async fn test_connection(pool: &SqlitePool) -> StatsResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}
