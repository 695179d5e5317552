//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::health_handler::HealthResponse;
use crate::handlers::user_handler::{CreateUserRequest, UpdateUserRequest};
use domain::{UserResponse, UserRole};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::user_handler::create_user,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::delete_user,
    ),
    components(
        schemas(
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            UserRole,
            HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints"),
        (name = "Health", description = "Liveness check"),
    )
)]
pub struct ApiDoc;
