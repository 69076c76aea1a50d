//! Banner and platform stats routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;
use tracity_api::{PlatformStats, BANNER};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/
pub(crate) async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": BANNER }))
}

/// GET /api/stats: dashboard counters.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<PlatformStats> {
    Json(state.api.stats().await)
}
