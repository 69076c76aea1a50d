//! Visualization route.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tracing::debug;
use tracity_query::request::parse_limit;

use super::respond;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/visualize/{collection}", get(visualize))
}

/// `limit` stays a string so an unparseable value falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Deserialize)]
struct VisualizeQuery {
    limit: Option<String>,
    states: Option<String>,
    years: Option<String>,
}

/// GET /api/visualize/{collection}?limit=&states=&years=
async fn visualize(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    Query(query): Query<VisualizeQuery>,
) -> Response {
    let limit = query.limit.as_deref().and_then(|raw| match parse_limit(raw) {
        Ok(limit) => Some(limit),
        Err(e) => {
            debug!("Using default visualize limit: {}", e);
            None
        }
    });
    respond(
        state
            .api
            .visualize(&collection, limit, query.states.as_deref(), query.years.as_deref())
            .await,
    )
}
