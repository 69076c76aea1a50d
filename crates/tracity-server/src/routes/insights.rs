//! Insight routes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::respond;
use crate::state::AppState;
use tracity_query::FilterRequest;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/insights/enhanced", post(enhanced_insights))
        .route("/insights/{collection}", get(dataset_insights))
}

#[derive(Debug, Deserialize)]
struct CsvFilterQuery {
    states: Option<String>,
    years: Option<String>,
}

/// POST /api/insights/enhanced
async fn enhanced_insights(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FilterRequest>,
) -> Response {
    respond(state.api.enhanced_insights(&req).await)
}

/// GET /api/insights/{collection}?states=&years=
async fn dataset_insights(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    Query(query): Query<CsvFilterQuery>,
) -> Response {
    respond(
        state
            .api
            .dataset_insights(&collection, query.states.as_deref(), query.years.as_deref())
            .await,
    )
}
