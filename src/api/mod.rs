/// API routes and handlers
pub mod health;
pub mod stats;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(stats::routes())
        .merge(health::routes())
}
