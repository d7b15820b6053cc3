/// Stats Service - one lookup per request: resolve, canonicalize, read
use crate::{
    error::{StatsError, StatsResult},
    identity::{canonicalize, IdentityResolver},
    metrics,
    stats::{PlayerStats, StatsRepository},
};
use std::{sync::Arc, time::Instant};
use tracing::{debug, info};

/// Stateless between calls; everything it holds is shared and injected
#[derive(Clone)]
pub struct StatsService {
    resolver: IdentityResolver,
    repository: Arc<dyn StatsRepository>,
}

impl StatsService {
    pub fn new(resolver: IdentityResolver, repository: Arc<dyn StatsRepository>) -> Self {
        Self {
            resolver,
            repository,
        }
    }

    /// Stats for the player currently using `display_name`
    ///
    /// Returns `StatsError::NotFound` when the player is unknown upstream or
    /// has never been tracked.
    pub async fn get_stats(&self, display_name: &str) -> StatsResult<PlayerStats> {
        let start = Instant::now();
        let result = self.lookup(display_name).await;

        let outcome = match &result {
            Ok(_) => "found",
            Err(StatsError::NotFound) => "not_found",
            Err(_) => "error",
        };
        metrics::STATS_LOOKUPS_TOTAL
            .with_label_values(&[outcome])
            .inc();
        metrics::STATS_LOOKUP_DURATION_SECONDS
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn lookup(&self, display_name: &str) -> StatsResult<PlayerStats> {
        let identity = self.resolver.resolve(display_name).await?;
        let uuid = canonicalize(&identity.id)?;

        info!("Looking up stats of user {} ({})", uuid, identity.name);

        match self.repository.find_by_identifier(&uuid).await? {
            Some(record) => Ok(PlayerStats::from_record(record, display_name)),
            None => {
                debug!("No stats row for {:?} ({:?})", display_name, uuid);
                Err(StatsError::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::MemoryIdentityCache,
        identity::{IdentityProvider, IdentityRecord},
        stats::StatsRecord,
    };
    use async_trait::async_trait;
    use std::{collections::HashMap, time::Duration};

    struct FixedProvider(HashMap<String, IdentityRecord>);

    #[async_trait]
    impl IdentityProvider for FixedProvider {
        async fn fetch(&self, display_name: &str) -> StatsResult<IdentityRecord> {
            Ok(self.0.get(display_name).cloned().unwrap_or_default())
        }
    }

    struct FixedRepository(Vec<StatsRecord>);

    #[async_trait]
    impl StatsRepository for FixedRepository {
        async fn find_by_identifier(
            &self,
            canonical_id: &str,
        ) -> StatsResult<Option<StatsRecord>> {
            Ok(self.0.iter().find(|r| r.uuid == canonical_id).cloned())
        }

        async fn ping(&self) -> StatsResult<()> {
            Ok(())
        }
    }

    fn service() -> StatsService {
        let mut players = HashMap::new();
        players.insert(
            "alice".to_string(),
            IdentityRecord::new("alice", "0123456789abcdef0123456789abcdef"),
        );
        players.insert(
            "bob".to_string(),
            IdentityRecord::new("bob", "ffffffffffffffffffffffffffffffff"),
        );
        players.insert(
            "ALICE".to_string(),
            IdentityRecord::new("alice", "0123456789abcdef0123456789abcdef"),
        );
        players.insert("broken".to_string(), IdentityRecord::new("broken", "xyz"));

        let resolver = IdentityResolver::new(
            Arc::new(MemoryIdentityCache::new()),
            Arc::new(FixedProvider(players)),
            Duration::from_secs(900),
        );
        let repository = FixedRepository(vec![StatsRecord {
            uuid: "01234567-89ab-cdef-0123-456789abcdef".to_string(),
            kills: 10,
            deaths: 2,
            coins: 500,
            killstreak: 3,
        }]);

        StatsService::new(resolver, Arc::new(repository))
    }

    #[tokio::test]
    async fn test_found() {
        let stats = service().get_stats("alice").await.unwrap();
        assert_eq!(stats.uuid, "01234567-89ab-cdef-0123-456789abcdef");
        assert_eq!(stats.username, "alice");
        assert_eq!(
            (stats.kills, stats.deaths, stats.coins, stats.killstreak),
            (10, 2, 500, 3)
        );
    }

    #[tokio::test]
    async fn test_known_player_without_stats() {
        let err = service().get_stats("bob").await.unwrap_err();
        assert!(matches!(err, StatsError::NotFound));
    }

    #[tokio::test]
    async fn test_unknown_player() {
        let err = service().get_stats("unknownplayer").await.unwrap_err();
        assert!(matches!(err, StatsError::NotFound));
    }

    #[tokio::test]
    async fn test_empty_name_passes_through() {
        let err = service().get_stats("").await.unwrap_err();
        assert!(matches!(err, StatsError::NotFound));
    }

    #[tokio::test]
    async fn test_malformed_identifier() {
        let err = service().get_stats("broken").await.unwrap_err();
        assert!(matches!(err, StatsError::MalformedIdentifier(_)));
    }

    #[tokio::test]
    async fn test_username_is_requested_name() {
        // Provider spells the name differently from the request
        let stats = service().get_stats("ALICE").await.unwrap();
        assert_eq!(stats.username, "ALICE");
        assert_eq!(stats.uuid, "01234567-89ab-cdef-0123-456789abcdef");
    }
}
