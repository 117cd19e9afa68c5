//! Health Check Endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

/// Health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Up,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}
