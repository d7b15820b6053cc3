/// In-process identity cache
use super::IdentityCache;
use crate::{error::StatsResult, identity::IdentityRecord};
use async_trait::async_trait;
use std::{collections::HashMap, time::Duration};
use tokio::{sync::RwLock, time::Instant};
use tracing::debug;

struct Entry {
    record: IdentityRecord,
    expires_at: Instant,
}

/// Map-backed cache with per-entry expiry
///
/// Used when Redis is disabled or unreachable at startup. Expired entries
/// are dropped on read, and every write sweeps the whole map.
#[derive(Default)]
pub struct MemoryIdentityCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryIdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Drop every expired entry, returning how many were removed
fn cleanup_expired(entries: &mut HashMap<String, Entry>) -> usize {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| entry.expires_at > now);

    let removed = before - entries.len();
    if removed > 0 {
        debug!("Cleaned up {} expired identities", removed);
    }
    removed
}

#[async_trait]
impl IdentityCache for MemoryIdentityCache {
    async fn get(&self, display_name: &str) -> StatsResult<Option<IdentityRecord>> {
        {
            let entries = self.entries.read().await;
            match entries.get(display_name) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.record.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(display_name) {
            if entry.expires_at <= Instant::now() {
                debug!("Evicting expired identity for {:?}", display_name);
                entries.remove(display_name);
            }
        }

        Ok(None)
    }

    async fn put(
        &self,
        display_name: &str,
        record: &IdentityRecord,
        ttl: Duration,
    ) -> StatsResult<()> {
        let mut entries = self.entries.write().await;
        cleanup_expired(&mut entries);
        entries.insert(
            display_name.to_string(),
            Entry {
                record: record.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn remove(&self, display_name: &str) -> StatsResult<()> {
        self.entries.write().await.remove(display_name);
        Ok(())
    }

    async fn ping(&self) -> StatsResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
