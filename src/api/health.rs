use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    upstream_base_url: String,
}

/// GET /health - Health check endpoint
///
/// Reports the process as healthy without probing the upstream API.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now(),
        upstream_base_url: state.cfg.upstream.base_url.clone(),
    };
    (StatusCode::OK, Json(response))
}

/// GET /health/live - Liveness probe for Kubernetes
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
