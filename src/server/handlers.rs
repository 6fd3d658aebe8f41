//! Route handlers

use super::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// `GET /api/apps`: cached apps as a JSON array
pub async fn apps(State(state): State<AppState>) -> Response {
    let apps = state.cache.apps();
    Json(apps.as_slice()).into_response()
}

/// `GET /api/config`: the loaded configuration
pub async fn config(State(state): State<AppState>) -> Response {
    Json(state.config.as_ref()).into_response()
}

/// `GET /healthz`: process liveness
pub async fn healthz() -> &'static str {
    "ok"
}

/// `GET /readyz`: ready once the cache has been filled
pub async fn readyz(State(state): State<AppState>) -> Response {
    if state.cache.is_ready() {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "cache not ready").into_response()
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}
