//! Liveness endpoints.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Public health check endpoint.
///
/// Returns basic service health for load balancer probes. Does not touch the
/// store or launch a browser.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "linkmeta-serve",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Plain-text banner on `/`.
pub async fn banner() -> &'static str {
    "Scraper service is running!"
}
