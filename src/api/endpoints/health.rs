//! Health check endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

/// `GET /api/health`: liveness check. Never touches the store, so it
/// answers even while the database is down.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Dental Clinic API is running",
        version: crate::config::APP_VERSION,
    })
}
