//! Chat route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;
use tracity_api::ChatResponse;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}

#[derive(Debug, Deserialize)]
struct ChatQuery {
    query: String,
    #[serde(default)]
    dataset: Option<String>,
}

/// POST /api/chat. Always answers 200.
async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatQuery>) -> Json<ChatResponse> {
    Json(state.api.chat(&req.query, req.dataset.as_deref()).await)
}
