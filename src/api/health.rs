/// Health check endpoints for liveness and readiness probes
///
/// Readiness depends on the stats store only. The identity cache is an
/// optimization, so an unreachable cache reports `degraded` but the service
/// stays ready.

use crate::context::AppContext;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Health status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Overall status: "healthy", "degraded", or "unhealthy"
    pub status: String,

    /// Application version
    pub version: String,

    /// Individual component checks
    pub checks: Vec<ComponentHealth>,
}

/// Health status of individual component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,

    /// Status: "healthy", "degraded", or "unhealthy"
    pub status: String,

    /// Response time in milliseconds
    pub response_time_ms: u64,

    /// Optional error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/health/live", get(liveness_probe))
        .route("/health/ready", get(readiness_probe))
        .route("/metrics", get(metrics_text))
}

/// Basic health check
pub async fn health_basic() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Liveness probe - if we can respond, we're alive
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe
///
/// Returns 200 when healthy or degraded, 503 when the stats store is down.
pub async fn readiness_probe(State(ctx): State<AppContext>) -> (StatusCode, Json<HealthStatus>) {
    let checks = vec![check_storage(&ctx).await, check_cache(&ctx).await];
    let status = determine_overall_status(&checks);

    let status_code = match status.as_str() {
        "unhealthy" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    if status_code != StatusCode::OK {
        tracing::warn!(status = %status, "readiness_probe_failed");
    }

    (
        status_code,
        Json(HealthStatus {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks,
        }),
    )
}

/// Prometheus scrape endpoint
pub async fn metrics_text() -> String {
    crate::metrics::gather()
}

async fn check_storage(ctx: &AppContext) -> ComponentHealth {
    let start = Instant::now();
    let result = ctx.stats_repository.ping().await;

    ComponentHealth {
        name: "storage".to_string(),
        status: if result.is_ok() { "healthy" } else { "unhealthy" }.to_string(),
        response_time_ms: start.elapsed().as_millis() as u64,
        error: result.err().map(|e| e.to_string()),
        details: None,
    }
}

async fn check_cache(ctx: &AppContext) -> ComponentHealth {
    let start = Instant::now();
    let result = ctx.identity_cache.ping().await;

    ComponentHealth {
        name: "identity_cache".to_string(),
        // Cache failures fall back to the provider
        status: if result.is_ok() { "healthy" } else { "degraded" }.to_string(),
        response_time_ms: start.elapsed().as_millis() as u64,
        error: result.err().map(|e| e.to_string()),
        details: Some(serde_json::json!({
            "backend": ctx.identity_cache.backend(),
        })),
    }
}

/// Determine overall health status from individual checks
fn determine_overall_status(checks: &[ComponentHealth]) -> String {
    let unhealthy_count = checks.iter().filter(|c| c.status == "unhealthy").count();
    let degraded_count = checks.iter().filter(|c| c.status == "degraded").count();

    if unhealthy_count > 0 {
        "unhealthy".to_string()
    } else if degraded_count > 0 {
        "degraded".to_string()
    } else {
        "healthy".to_string()
    }
}
