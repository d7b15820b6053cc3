/// MySQL database support
///
/// The stats table is written by the game servers; this service only reads it.

use crate::{
    config::DatabaseConfig,
    error::{StatsError, StatsResult},
};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{error, info};

/// Minimum pooled connections kept open
const MIN_CONNECTIONS: u32 = 1;

/// Maximum lifetime of a connection in seconds
const MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

/// Idle timeout for connections in seconds
const IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes

/// Create a MySQL connection pool
pub async fn create_pool(config: &DatabaseConfig) -> StatsResult<MySqlPool> {
    info!("Connecting to MySQL stats store...");
    info!("  Max connections: {}", config.max_connections);

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(MIN_CONNECTIONS.min(config.max_connections))
        .acquire_timeout(config.timeout())
        .max_lifetime(std::time::Duration::from_secs(MAX_LIFETIME_SECS))
        .idle_timeout(std::time::Duration::from_secs(IDLE_TIMEOUT_SECS))
        .connect(&config.url)
        .await
        .map_err(|e| {
            error!("Failed to connect to MySQL: {}", e);
            StatsError::Database(e)
        })?;

    info!("MySQL connection established");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = DatabaseConfig {
            url: format!("mysql://stats@{}/pvp", addr),
            max_connections: 1,
            timeout_ms: 500,
        };

        let result = create_pool(&config).await;
        assert!(matches!(result, Err(StatsError::Database(_))));
    }
}
