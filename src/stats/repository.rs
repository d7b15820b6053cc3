/// Stats repository - read access to the `pvpstats` table
use crate::{
    error::{StatsError, StatsResult},
    stats::StatsRecord,
};
use async_trait::async_trait;
use sqlx::{mysql::MySqlPool, sqlite::SqlitePool};
use std::{future::Future, time::Duration};

/// First row matching the identifier; duplicates beyond it are ignored
const FIND_BY_IDENTIFIER: &str = r#"
    SELECT uuid, kills, deaths, coins, killstreak
    FROM pvpstats
    WHERE uuid = ?
    LIMIT 1
"#;

/// Read-only access to persisted stats
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Stats for a canonical identifier; `Ok(None)` when no row matches
    async fn find_by_identifier(&self, canonical_id: &str) -> StatsResult<Option<StatsRecord>>;

    /// Check the store is reachable
    async fn ping(&self) -> StatsResult<()>;
}

/// Bound a query by the configured timeout
async fn bounded<T, F>(timeout: Duration, fut: F) -> StatsResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(StatsError::Database),
        Err(_) => Err(StatsError::StorageUnavailable(format!(
            "query timed out after {:?}",
            timeout
        ))),
    }
}

/// Stats repository over a MySQL pool
#[derive(Clone)]
pub struct MySqlStatsRepository {
    pool: MySqlPool,
    timeout: Duration,
}

impl MySqlStatsRepository {
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl StatsRepository for MySqlStatsRepository {
    async fn find_by_identifier(&self, canonical_id: &str) -> StatsResult<Option<StatsRecord>> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, StatsRecord>(FIND_BY_IDENTIFIER)
                .bind(canonical_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn ping(&self) -> StatsResult<()> {
        bounded(self.timeout, sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }
}

/// Stats repository over a SQLite pool
#[derive(Clone)]
pub struct SqliteStatsRepository {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteStatsRepository {
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl StatsRepository for SqliteStatsRepository {
    async fn find_by_identifier(&self, canonical_id: &str) -> StatsResult<Option<StatsRecord>> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, StatsRecord>(FIND_BY_IDENTIFIER)
                .bind(canonical_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn ping(&self) -> StatsResult<()> {
        bounded(self.timeout, sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_repository() -> SqliteStatsRepository {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            r#"
            CREATE TABLE pvpstats (
                uuid TEXT NOT NULL,
                kills INTEGER NOT NULL,
                deaths INTEGER NOT NULL,
                coins INTEGER NOT NULL,
                killstreak INTEGER NOT NULL
            )
            "#,
        )
        .execute(&db)
        .await
        .unwrap();

        SqliteStatsRepository::new(db, Duration::from_secs(5))
    }

    async fn insert(repo: &SqliteStatsRepository, uuid: &str, kills: i32) {
        sqlx::query(
            "INSERT INTO pvpstats (uuid, kills, deaths, coins, killstreak) VALUES (?, ?, 2, 500, 3)",
        )
        .bind(uuid)
        .bind(kills)
        .execute(&repo.pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_find_existing() {
        let repo = create_test_repository().await;
        insert(&repo, "01234567-89ab-cdef-0123-456789abcdef", 10).await;

        let record = repo
            .find_by_identifier("01234567-89ab-cdef-0123-456789abcdef")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            record,
            StatsRecord {
                uuid: "01234567-89ab-cdef-0123-456789abcdef".to_string(),
                kills: 10,
                deaths: 2,
                coins: 500,
                killstreak: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_missing_row_is_none() {
        let repo = create_test_repository().await;
        insert(&repo, "01234567-89ab-cdef-0123-456789abcdef", 10).await;

        assert!(repo.find_by_identifier("").await.unwrap().is_none());
        assert!(repo
            .find_by_identifier("ffffffff-ffff-ffff-ffff-ffffffffffff")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicates_return_one_row() {
        let repo = create_test_repository().await;
        insert(&repo, "01234567-89ab-cdef-0123-456789abcdef", 10).await;
        insert(&repo, "01234567-89ab-cdef-0123-456789abcdef", 99).await;

        let record = repo
            .find_by_identifier("01234567-89ab-cdef-0123-456789abcdef")
            .await
            .unwrap();
        assert!(record.is_some());
    }

    #[tokio::test]
    async fn test_missing_table_is_storage_error() {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repo = SqliteStatsRepository::new(db, Duration::from_secs(5));

        let err = repo.find_by_identifier("x").await.unwrap_err();
        assert!(matches!(err, StatsError::Database(_)));
    }

    #[tokio::test]
    async fn test_ping() {
        let repo = create_test_repository().await;
        assert!(repo.ping().await.is_ok());
    }
}
