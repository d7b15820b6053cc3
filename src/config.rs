/// Configuration management for the stats service
use crate::error::{StatsError, StatsResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub provider: ProviderConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Stats store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `mysql://...` or `sqlite:...`
    pub url: String,
    pub max_connections: u32,
    /// Bounds both pool acquisition and each query, in milliseconds
    pub timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 10,
            timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Identity cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Use Redis; otherwise identities are cached in process
    pub enabled: bool,

    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub redis_url: String,

    /// Key prefix for identity entries (default: "players:")
    pub key_prefix: String,

    /// Identity TTL in seconds (default: 900 = 15 minutes)
    pub identity_ttl: u64,

    /// Per-operation timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_url: "redis://localhost:6379".to_string(),
            key_prefix: "players:".to_string(),
            identity_ttl: 900,
            timeout_ms: 500,
        }
    }
}

impl CacheConfig {
    pub fn identity_ttl(&self) -> Duration {
        Duration::from_secs(self.identity_ttl)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Lookup base; the display name is appended as the last path segment
    pub base_url: String,
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mojang.com/users/profiles/minecraft".to_string(),
            user_agent: format!("pvpstats-server/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 10_000,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: 50,
            burst_size: 100,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "pvpstats_server=info,tower_http=info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> StatsResult<Self> {
        dotenv::dotenv().ok();

        let defaults = ServerConfig::default();

        let hostname = env::var("STATS_HOSTNAME").unwrap_or(defaults.service.hostname);
        let port = env::var("STATS_PORT")
            .unwrap_or_else(|_| defaults.service.port.to_string())
            .parse()
            .map_err(|_| StatsError::Validation("Invalid port number".to_string()))?;

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => mysql_url_from_parts()?,
        };
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", defaults.database.max_connections);
        let database_timeout_ms = parse_or("DATABASE_TIMEOUT_MS", defaults.database.timeout_ms);

        let cache_enabled = parse_or("CACHE_ENABLED", defaults.cache.enabled);
        let redis_url = env::var("REDIS_URL").unwrap_or(defaults.cache.redis_url);
        let key_prefix = env::var("CACHE_KEY_PREFIX").unwrap_or(defaults.cache.key_prefix);
        let identity_ttl = parse_or("CACHE_IDENTITY_TTL", defaults.cache.identity_ttl);
        let cache_timeout_ms = parse_or("CACHE_TIMEOUT_MS", defaults.cache.timeout_ms);

        let provider_url = env::var("MOJANG_API_URL").unwrap_or(defaults.provider.base_url);
        let user_agent = env::var("PROVIDER_USER_AGENT").unwrap_or(defaults.provider.user_agent);
        let provider_timeout_ms = parse_or("PROVIDER_TIMEOUT_MS", defaults.provider.timeout_ms);

        let rate_limit_enabled = parse_or("RATE_LIMIT_ENABLED", defaults.rate_limit.enabled);
        let requests_per_second =
            parse_or("RATE_LIMIT_RPS", defaults.rate_limit.requests_per_second);
        let burst_size = parse_or("RATE_LIMIT_BURST", defaults.rate_limit.burst_size);

        let log_level = env::var("RUST_LOG").unwrap_or(defaults.logging.level);

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                timeout_ms: database_timeout_ms,
            },
            cache: CacheConfig {
                enabled: cache_enabled,
                redis_url,
                key_prefix,
                identity_ttl,
                timeout_ms: cache_timeout_ms,
            },
            provider: ProviderConfig {
                base_url: provider_url,
                user_agent,
                timeout_ms: provider_timeout_ms,
            },
            rate_limit: RateLimitConfig {
                enabled: rate_limit_enabled,
                requests_per_second,
                burst_size,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> StatsResult<()> {
        if self.service.hostname.is_empty() {
            return Err(StatsError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.database.url.is_empty() {
            return Err(StatsError::Validation("Database URL cannot be empty".to_string()));
        }

        if self.cache.identity_ttl == 0 {
            return Err(StatsError::Validation(
                "Identity cache TTL must be greater than zero".to_string(),
            ));
        }

        if self.database.timeout_ms == 0
            || self.cache.timeout_ms == 0
            || self.provider.timeout_ms == 0
        {
            return Err(StatsError::Validation("Timeouts must be greater than zero".to_string()));
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.hostname, self.service.port)
    }
}

/// Build a MySQL URL from the DATABASE_USER/PASSWORD/HOST/NAME variables
fn mysql_url_from_parts() -> StatsResult<String> {
    let host = env::var("DATABASE_HOST").map_err(|_| {
        StatsError::Validation("DATABASE_URL or DATABASE_HOST must be set".to_string())
    })?;
    let name = env::var("DATABASE_NAME")
        .map_err(|_| StatsError::Validation("DATABASE_NAME must be set".to_string()))?;
    let user = env::var("DATABASE_USER").unwrap_or_default();
    let password = env::var("DATABASE_PASSWORD").unwrap_or_default();

    Ok(mysql_url(&user, &password, &host, &name))
}

fn mysql_url(user: &str, password: &str, host: &str, name: &str) -> String {
    let credentials = match (user.is_empty(), password.is_empty()) {
        (true, _) => String::new(),
        (false, true) => format!("{}@", urlencoding::encode(user)),
        (false, false) => format!(
            "{}:{}@",
            urlencoding::encode(user),
            urlencoding::encode(password)
        ),
    };

    format!("mysql://{}{}/{}", credentials, host, name)
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
