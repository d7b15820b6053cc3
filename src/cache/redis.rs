/// Redis-backed identity cache
///
/// Entries live under `<prefix><display name>` (by default
/// `players:<display name>`) as JSON-encoded identity records with a
/// server-side expiry.
use super::IdentityCache;
use crate::{
    config::CacheConfig,
    error::{StatsError, StatsResult},
    identity::IdentityRecord,
};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::{future::Future, time::Duration};
use tracing::{debug, error, info, warn};

/// Redis cache client
#[derive(Clone)]
pub struct RedisIdentityCache {
    connection: ConnectionManager,
    key_prefix: String,
    timeout: Duration,
}

impl RedisIdentityCache {
    /// Connect to Redis
    pub async fn connect(config: &CacheConfig) -> StatsResult<Self> {
        info!("Connecting to Redis at {}", config.redis_url);

        let client = Client::open(config.redis_url.as_str()).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            StatsError::CacheUnavailable(format!("Redis client creation failed: {}", e))
        })?;

        let connection = with_timeout(config.timeout(), "connect", async {
            ConnectionManager::new(client).await.map_err(|e| {
                StatsError::CacheUnavailable(format!("Redis connection failed: {}", e))
            })
        })
        .await?;

        info!("Redis connection established");

        Ok(Self {
            connection,
            key_prefix: config.key_prefix.clone(),
            timeout: config.timeout(),
        })
    }

    /// Build a cache key with prefix
    fn build_key(&self, display_name: &str) -> String {
        cache_key(&self.key_prefix, display_name)
    }
}

pub(crate) fn cache_key(prefix: &str, display_name: &str) -> String {
    format!("{}{}", prefix, display_name)
}

/// A stored value, decoded
#[derive(Debug, PartialEq)]
enum CachedEntry {
    Valid(IdentityRecord),
    /// Not an identity record; the entry is deleted and read as a miss
    Corrupted,
}

fn decode_entry(cache_key: &str, json: &str) -> CachedEntry {
    match serde_json::from_str(json) {
        Ok(record) => CachedEntry::Valid(record),
        Err(e) => {
            warn!("Failed to deserialize cached identity {}: {}", cache_key, e);
            CachedEntry::Corrupted
        }
    }
}

/// Bound a Redis call by the configured timeout
async fn with_timeout<T, F>(timeout: Duration, op: &str, fut: F) -> StatsResult<T>
where
    F: Future<Output = StatsResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(StatsError::CacheUnavailable(format!(
            "Redis {} timed out after {:?}",
            op, timeout
        ))),
    }
}

#[async_trait]
impl IdentityCache for RedisIdentityCache {
    async fn get(&self, display_name: &str) -> StatsResult<Option<IdentityRecord>> {
        let cache_key = self.build_key(display_name);

        debug!("Cache GET: {}", cache_key);

        let mut conn = self.connection.clone();
        let result: Option<String> = with_timeout(self.timeout, "GET", async {
            conn.get(&cache_key).await.map_err(|e| {
                StatsError::CacheUnavailable(format!("Redis GET failed for {}: {}", cache_key, e))
            })
        })
        .await?;

        match result.map(|json| decode_entry(&cache_key, &json)) {
            Some(CachedEntry::Valid(record)) => Ok(Some(record)),
            Some(CachedEntry::Corrupted) => {
                if let Err(e) = self.remove(display_name).await {
                    warn!("Failed to delete corrupted identity {}: {}", cache_key, e);
                }
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        display_name: &str,
        record: &IdentityRecord,
        ttl: Duration,
    ) -> StatsResult<()> {
        let cache_key = self.build_key(display_name);
        // SET EX takes whole seconds
        let ttl_secs = ttl.as_secs().max(1);

        debug!("Cache SET: {} (TTL: {}s)", cache_key, ttl_secs);

        let json = serde_json::to_string(record).map_err(|e| {
            StatsError::Internal(format!("Cache serialization failed: {}", e))
        })?;

        let mut conn = self.connection.clone();
        with_timeout(self.timeout, "SET", async {
            conn.set_ex(&cache_key, json, ttl_secs)
                .await
                .map_err(|e| {
                    StatsError::CacheUnavailable(format!(
                        "Redis SET failed for {}: {}",
                        cache_key, e
                    ))
                })
        })
        .await
    }

    async fn remove(&self, display_name: &str) -> StatsResult<()> {
        let cache_key = self.build_key(display_name);

        debug!("Cache DELETE: {}", cache_key);

        let mut conn = self.connection.clone();
        with_timeout(self.timeout, "DEL", async {
            conn.del(&cache_key).await.map_err(|e| {
                StatsError::CacheUnavailable(format!("Redis DEL failed for {}: {}", cache_key, e))
            })
        })
        .await
    }

    async fn ping(&self) -> StatsResult<()> {
        let mut conn = self.connection.clone();
        let pong: String = with_timeout(self.timeout, "PING", async {
            redis::cmd("PING")
                .query_async(&mut conn)
                .await
                .map_err(|e| StatsError::CacheUnavailable(format!("Redis PING failed: {}", e)))
        })
        .await?;

        if pong != "PONG" {
            return Err(StatsError::CacheUnavailable(
                "Unexpected Redis PING response".to_string(),
            ));
        }

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
