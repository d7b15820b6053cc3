/// Stats endpoints
///
/// `GET /stats?username=<name>` is the only implemented operation. The write
/// endpoints are declared so clients get a definite answer.
use crate::{
    context::AppContext,
    error::{StatsError, StatsResult},
    stats::PlayerStats,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    /// Display name; absent is the same as empty
    #[serde(default)]
    pub username: String,
}

/// Build stats routes
pub fn routes() -> Router<AppContext> {
    Router::new().route(
        "/stats",
        get(get_stats).post(create_stats).delete(delete_stats),
    )
}

pub async fn get_stats(
    State(ctx): State<AppContext>,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> StatsResult<Json<PlayerStats>> {
    let Query(params) = params.map_err(|e| StatsError::Validation(e.body_text()))?;
    let stats = ctx.stats_service.get_stats(&params.username).await?;

    Ok(Json(stats))
}

pub async fn create_stats() -> StatsError {
    StatsError::NotImplemented("stats are written by the game servers".to_string())
}

pub async fn delete_stats() -> StatsError {
    StatsError::NotImplemented("stats are written by the game servers".to_string())
}
