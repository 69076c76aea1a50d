//! Filtered data route.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};

use super::respond;
use crate::state::AppState;
use tracity_query::FilterRequest;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/data/filtered", post(filtered_data))
}

/// POST /api/data/filtered
async fn filtered_data(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FilterRequest>,
) -> Response {
    respond(state.api.filter_data(&req).await)
}
