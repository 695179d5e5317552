//! Route configuration.

use std::time::Duration;

use axum::{
    http::{header, Method},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{debug_routes, health_routes, user_routes};
use crate::openapi::ApiDoc;
use crate::state::AppState;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let mut api = Router::new().merge(health_routes()).merge(user_routes());

    if state.server.is_development() {
        api = api.merge(debug_routes());
    }

    let timeout = Duration::from_secs(state.server.request_timeout_secs);

    Router::new()
        .nest("/api/v1", api)
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
