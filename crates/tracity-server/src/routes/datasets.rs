//! Dataset listing and metadata routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;
use tracity_api::DatasetInfo;
use tracity_query::CollectionMetadata;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/datasets", get(list_datasets))
        .route("/metadata/{collection}", get(get_metadata))
}

/// GET /api/datasets
async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<Vec<DatasetInfo>> {
    Json(state.api.datasets().await)
}

/// GET /api/metadata/{collection}: available filter values.
async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
) -> Json<CollectionMetadata> {
    Json(state.api.describe_metadata(&collection).await)
}
