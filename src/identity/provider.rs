/// Identity provider - Mojang name to profile lookup
use crate::{
    config::ProviderConfig,
    error::{StatsError, StatsResult},
    identity::IdentityRecord,
    metrics,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

/// Source of truth for display name to identity lookups
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up `display_name`. An unknown player is `Ok` with an empty id.
    async fn fetch(&self, display_name: &str) -> StatsResult<IdentityRecord>;
}

/// Mojang profile API client
#[derive(Clone)]
pub struct MojangProvider {
    http_client: reqwest::Client,
    base_url: String,
}

impl MojangProvider {
    /// Create a new provider client
    pub fn new(config: &ProviderConfig) -> StatsResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .build()
            .map_err(|e| StatsError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn profile_url(&self, display_name: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(display_name))
    }
}

#[async_trait]
impl IdentityProvider for MojangProvider {
    async fn fetch(&self, display_name: &str) -> StatsResult<IdentityRecord> {
        let url = self.profile_url(display_name);
        debug!("Provider GET: {}", url);

        let result = fetch_profile(&self.http_client, &url).await;

        let outcome = match &result {
            Ok(record) if record.is_unknown() => "unknown",
            Ok(_) => "found",
            Err(e) => {
                warn!("Profile lookup failed for {:?}: {}", display_name, e);
                "error"
            }
        };
        metrics::PROVIDER_REQUESTS_TOTAL
            .with_label_values(&[outcome])
            .inc();

        result
    }
}

async fn fetch_profile(client: &reqwest::Client, url: &str) -> StatsResult<IdentityRecord> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| StatsError::ProviderUnavailable(format!("Failed to reach provider: {}", e)))?;

    let status = response.status();
    if is_unknown_player(status) {
        debug!("Provider answered {} - treating player as unknown", status);
        return Ok(IdentityRecord::unknown());
    }

    if !status.is_success() {
        return Err(StatsError::ProviderUnavailable(format!(
            "Provider returned error: {}",
            status
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| StatsError::ProviderUnavailable(format!("Failed to read provider body: {}", e)))?;

    decode_profile(&body)
}

/// No-content and client errors (invalid or unknown names) mean no such
/// player. Throttling is a provider-side condition and stays an error.
fn is_unknown_player(status: StatusCode) -> bool {
    status == StatusCode::NO_CONTENT
        || (status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS)
}

/// Decode a provider body. Blank bodies mean the player is unknown.
fn decode_profile(body: &[u8]) -> StatsResult<IdentityRecord> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(IdentityRecord::unknown());
    }

    serde_json::from_slice(body)
        .map_err(|e| StatsError::ProviderDecode(format!("Invalid profile document: {}", e)))
}
