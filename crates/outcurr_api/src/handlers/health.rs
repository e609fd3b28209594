//! Unauthenticated liveness probe.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /outcurrapi/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: outcurr_core::ping(),
        version: outcurr_core::core_version(),
    })
}
