/// Application context and dependency injection
use crate::{
    cache::{IdentityCache, MemoryIdentityCache, RedisIdentityCache},
    config::ServerConfig,
    db,
    error::StatsResult,
    identity::{IdentityProvider, IdentityResolver, MojangProvider},
    rate_limit::RateLimiter,
    stats::{StatsRepository, StatsService},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub identity_cache: Arc<dyn IdentityCache>,
    pub stats_repository: Arc<dyn StatsRepository>,
    pub stats_service: Arc<StatsService>,
    pub rate_limiter: RateLimiter,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> StatsResult<Self> {
        // Validate configuration
        config.validate()?;

        // Storage is required; fail startup rather than serve every request a 503
        let stats_repository = db::connect_stats_repository(&config.database).await?;

        let identity_cache = Self::connect_cache(&config).await;

        let provider: Arc<dyn IdentityProvider> = Arc::new(MojangProvider::new(&config.provider)?);

        Ok(Self::from_parts(
            config,
            identity_cache,
            provider,
            stats_repository,
        ))
    }

    /// Assemble a context from already-built collaborators
    pub fn from_parts(
        config: ServerConfig,
        identity_cache: Arc<dyn IdentityCache>,
        provider: Arc<dyn IdentityProvider>,
        stats_repository: Arc<dyn StatsRepository>,
    ) -> Self {
        let resolver = IdentityResolver::new(
            identity_cache.clone(),
            provider,
            config.cache.identity_ttl(),
        );
        let stats_service = Arc::new(StatsService::new(resolver, stats_repository.clone()));
        let rate_limiter = RateLimiter::new(&config.rate_limit);

        Self {
            config: Arc::new(config),
            identity_cache,
            stats_repository,
            stats_service,
            rate_limiter,
        }
    }

    /// Redis when enabled and reachable, otherwise an in-process cache
    async fn connect_cache(config: &ServerConfig) -> Arc<dyn IdentityCache> {
        if !config.cache.enabled {
            info!("Redis cache disabled - caching identities in process");
            return Arc::new(MemoryIdentityCache::new());
        }

        match RedisIdentityCache::connect(&config.cache).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                warn!("Redis unavailable, caching identities in process: {}", e);
                Arc::new(MemoryIdentityCache::new())
            }
        }
    }
}
