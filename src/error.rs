/// Unified error types for the stats service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned when a player has no stats row
pub const NO_STATS_MESSAGE: &str = "No stats available for this player.";

/// Main error type for the service
///
/// Every variant is scoped to the request that produced it. Nothing here
/// terminates the process.
#[derive(Error, Debug)]
pub enum StatsError {
    /// Transport failure, timeout or unexpected status from the identity provider
    #[error("Identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Identity provider answered with a body we could not decode
    #[error("Identity provider returned an undecodable response: {0}")]
    ProviderDecode(String),

    /// Identifier that is neither canonical nor 32 hex characters
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// Cache backend errors (the resolver treats these as a miss)
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// No stats row for the resolved identifier
    #[error("{}", NO_STATS_MESSAGE)]
    NotFound,

    /// Query or connectivity failure against the stats store
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Database driver errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Rate limiting errors
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Declared endpoints without behaviour
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StatsError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StatsError::ProviderUnavailable(_) | StatsError::ProviderDecode(_) => {
                StatusCode::BAD_GATEWAY
            }
            StatsError::MalformedIdentifier(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StatsError::NotFound => StatusCode::NOT_FOUND,
            StatsError::CacheUnavailable(_)
            | StatsError::StorageUnavailable(_)
            | StatsError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            StatsError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            StatsError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            StatsError::Validation(_) => StatusCode::BAD_REQUEST,
            StatsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_message: String,
}

/// Convert StatsError to HTTP response
impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match &self {
            StatsError::StorageUnavailable(_) | StatsError::Database(_) => {
                tracing::error!(error = %self, "request failed on storage");
                "Stats storage is temporarily unavailable".to_string() // Don't leak details
            }
            StatsError::CacheUnavailable(_) => {
                tracing::error!(error = %self, "request failed on identity cache");
                "Identity cache is temporarily unavailable".to_string()
            }
            StatsError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            StatsError::ProviderUnavailable(_) | StatsError::ProviderDecode(_) => {
                tracing::warn!(error = %self, "identity provider failure");
                "Player identity lookup is temporarily unavailable".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error_message })).into_response()
    }
}

/// Result type alias for service operations
pub type StatsResult<T> = Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        assert_eq!(StatsError::NotFound.to_string(), NO_STATS_MESSAGE);
        assert_eq!(StatsError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_provider_errors_are_bad_gateway() {
        assert_eq!(
            StatsError::ProviderUnavailable("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            StatsError::ProviderDecode("eof".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    async fn body_of(error: StatsError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_cache_and_storage_errors_are_reported_separately() {
        let (status, body) = body_of(StatsError::CacheUnavailable("redis down".into())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error_message, "Identity cache is temporarily unavailable");

        let (status, body) = body_of(StatsError::StorageUnavailable("mysql down".into())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error_message, "Stats storage is temporarily unavailable");
    }

    #[test]
    fn test_storage_errors_are_service_unavailable() {
        assert_eq!(
            StatsError::StorageUnavailable("down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            StatsError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
