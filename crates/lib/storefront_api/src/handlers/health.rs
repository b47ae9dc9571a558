//! Liveness endpoints.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /`: plain-text liveness probe.
pub async fn root() -> &'static str {
    "API is running..."
}

/// `GET /api/health`: version and active storage backend.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: storefront_core::version().to_string(),
        storage: state.config.storage.to_string(),
    })
}
