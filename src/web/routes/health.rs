//! Liveness probe.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::web::AppState;

/// `GET /health`: returns `ok` without touching the database.
async fn health() -> &'static str {
    "ok"
}

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
