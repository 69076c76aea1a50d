//! HTTP route handlers.

pub mod chat;
pub mod data;
pub mod datasets;
pub mod insights;
pub mod stats;
pub mod visualize;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::state::AppState;
use tracity_core::{Error, Result};

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api", get(stats::root))
        .route("/api/", get(stats::root))
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(stats::routes())
        .merge(datasets::routes())
        .merge(data::routes())
        .merge(insights::routes())
        .merge(chat::routes())
        .merge(visualize::routes())
}

/// 200 with the body, or the error's mapped status.
pub(crate) fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => error_response(e),
    }
}

/// NotFound is the only client-visible failure; an empty match still
/// answers 200 with a `no_data` status.
pub(crate) fn error_response(e: Error) -> Response {
    match e {
        Error::NotFound(detail) => {
            (StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response()
        }
        Error::NoData(detail) => (
            StatusCode::OK,
            Json(json!({ "status": "no_data", "detail": detail })),
        )
            .into_response(),
        other => {
            error!("Request failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": other.to_string() })),
            )
                .into_response()
        }
    }
}
