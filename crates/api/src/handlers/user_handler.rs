//! User handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use common::AppResult;
use domain::{UpdateUser, UserResponse, DEFAULT_PAGE_OFFSET, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// User creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Email address, unique across users
    #[serde(default)]
    #[validate(
        custom(function = "present", message = "email and name are required"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Display name
    #[serde(default)]
    #[validate(
        custom(function = "present", message = "email and name are required"),
        length(max = 255, message = "name must be at most 255 characters")
    )]
    #[schema(example = "Jane Doe")]
    pub name: String,
}

fn present(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Partial user update; omitted or empty fields keep their current value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(max = 255, message = "email must be at most 255 characters"))]
    #[schema(example = "jane.doe@example.com")]
    pub email: Option<String>,
    #[validate(length(max = 255, message = "name must be at most 255 characters"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        UpdateUser {
            email: req.email,
            name: req.name,
        }
    }
}

/// Raw pagination parameters, parsed leniently
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page size (default 10, max 100)
    pub limit: Option<String>,
    /// Rows to skip (default 0)
    pub offset: Option<String>,
}

impl ListUsersQuery {
    /// Non-numeric or non-positive limits fall back to the default.
    pub fn limit(&self) -> u64 {
        self.limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .map(|v| (v as u64).min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Non-numeric or negative offsets fall back to zero.
    pub fn offset(&self) -> u64 {
        self.offset
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_PAGE_OFFSET)
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .create_user(&payload.email, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List users, newest first
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserResponse>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list_users(query.limit(), query.offset())
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Malformed user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user_by_id(&id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update user email and/or name
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(&id, payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Malformed user ID"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.user_service.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
