/// Metrics and telemetry
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - Identity cache hit/miss rates
/// - Identity provider outcomes
/// - Stats lookup outcomes and latencies

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Identity cache reads by result (hit, miss, error)
    pub static ref CACHE_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "identity_cache_requests_total",
        "Identity cache reads by result",
        &["result"]
    )
    .unwrap();

    /// Identity provider calls by outcome (found, unknown, error)
    pub static ref PROVIDER_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "identity_provider_requests_total",
        "Identity provider lookups by outcome",
        &["outcome"]
    )
    .unwrap();

    /// Stats lookups by outcome (found, not_found, error)
    pub static ref STATS_LOOKUPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "stats_lookups_total",
        "Stats lookups by outcome",
        &["outcome"]
    )
    .unwrap();

    /// End-to-end stats lookup duration in seconds
    pub static ref STATS_LOOKUP_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "stats_lookup_duration_seconds",
        "Stats lookup latencies in seconds",
        &["outcome"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();
}

/// Render all registered metrics in the Prometheus text format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
