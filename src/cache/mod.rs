/// Identity cache backends
///
/// The cache maps a display name to the serialized identity the provider
/// returned for it. Population is owned by the resolver; backends only
/// store, expire and report.

pub mod memory;
pub mod redis;

pub use self::memory::MemoryIdentityCache;
pub use self::redis::RedisIdentityCache;

use crate::{error::StatsResult, identity::IdentityRecord};
use async_trait::async_trait;
use std::time::Duration;

/// Key/value store for resolved identities
#[async_trait]
pub trait IdentityCache: Send + Sync {
    /// Unexpired entry for `display_name`, if any
    async fn get(&self, display_name: &str) -> StatsResult<Option<IdentityRecord>>;

    /// Unconditionally overwrite the entry and restart its TTL
    async fn put(&self, display_name: &str, record: &IdentityRecord, ttl: Duration)
        -> StatsResult<()>;

    /// Drop the entry for `display_name`
    async fn remove(&self, display_name: &str) -> StatsResult<()>;

    /// Check the backend is reachable
    async fn ping(&self) -> StatsResult<()>;

    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;
}
