//! Health check endpoint
//!
//! `/health` returns "healthy" plus the crate version, for load balancers
//! and liveness probes.

use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Create health routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
