/// Identity Resolver - cache-aside lookup of display names
use crate::{
    cache::IdentityCache,
    error::StatsResult,
    identity::{IdentityProvider, IdentityRecord},
    metrics,
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Combines the identity cache with the upstream provider
///
/// The cache is consulted first, unconditionally. Only on a miss is the
/// provider called, and its answer (unknown players included) is written
/// back with a fixed TTL. Cache failures degrade to a miss.
#[derive(Clone)]
pub struct IdentityResolver {
    cache: Arc<dyn IdentityCache>,
    provider: Arc<dyn IdentityProvider>,
    ttl: Duration,
}

impl IdentityResolver {
    /// Create a new identity resolver
    pub fn new(
        cache: Arc<dyn IdentityCache>,
        provider: Arc<dyn IdentityProvider>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            provider,
            ttl,
        }
    }

    /// Resolve a display name to its identity
    ///
    /// Resolution order:
    /// 1. Cache (a backend error counts as a miss)
    /// 2. Provider
    /// 3. Write the provider's answer back (a backend error is only logged)
    pub async fn resolve(&self, display_name: &str) -> StatsResult<IdentityRecord> {
        match self.cache.get(display_name).await {
            Ok(Some(record)) => {
                debug!("Cache HIT: {:?}", display_name);
                metrics::CACHE_REQUESTS_TOTAL.with_label_values(&["hit"]).inc();
                return Ok(record);
            }
            Ok(None) => {
                debug!("Cache MISS: {:?}", display_name);
                metrics::CACHE_REQUESTS_TOTAL.with_label_values(&["miss"]).inc();
            }
            Err(e) => {
                warn!(
                    backend = self.cache.backend(),
                    "Identity cache read failed, falling back to provider: {}", e
                );
                metrics::CACHE_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
            }
        }

        let record = self.provider.fetch(display_name).await?;

        if let Err(e) = self.cache.put(display_name, &record, self.ttl).await {
            warn!(
                backend = self.cache.backend(),
                "Failed to cache identity for {:?}: {}", display_name, e
            );
        }

        Ok(record)
    }
}
