//! Health check and diagnostics handlers.

use axum::{response::Json, routing::get, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Liveness payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    /// RFC 3339 timestamp of the check
    pub timestamp: String,
}

/// Route listing served in development.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<&'static str>,
}

/// Every public route, in registration order.
pub const ROUTES: &[&str] = &[
    "GET /api/v1/health",
    "POST /api/v1/users",
    "GET /api/v1/users",
    "GET /api/v1/users/:id",
    "PUT /api/v1/users/:id",
    "DELETE /api/v1/users/:id",
];

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Create development-only diagnostic routes.
pub fn debug_routes() -> Router<AppState> {
    Router::new().route("/debug/routes", get(list_routes))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

pub async fn list_routes() -> Json<RoutesResponse> {
    Json(RoutesResponse {
        routes: ROUTES.to_vec(),
    })
}
