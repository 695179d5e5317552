//! Unified error handling.
//!
//! Provides the closed set of failure kinds shared by the service layer and
//! the HTTP layer, plus the conversion to Axum HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Boxed cause carried by [`AppError::Internal`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application error kinds. Callers branch with `matches!`.
#[derive(Error, Debug)]
pub enum AppError {
    // Entity validation
    #[error("invalid user email")]
    InvalidUserEmail,

    #[error("invalid user name")]
    InvalidUserName,

    #[error("invalid user ID")]
    InvalidUserId,

    #[error("invalid user role")]
    InvalidUserRole,

    #[error("invalid OTP")]
    InvalidOtp,

    #[error("OTP expires at is in the past")]
    InvalidOtpExpiresAt,

    // Resource errors
    #[error("user not found")]
    UserNotFound,

    #[error("user already exists")]
    UserAlreadyExists,

    // Request errors
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    // Authentication & Authorization
    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    // Internal
    #[error("{context}")]
    Internal {
        context: String,
        #[source]
        source: Option<BoxError>,
    },
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidUserEmail => "INVALID_USER_EMAIL",
            AppError::InvalidUserName => "INVALID_USER_NAME",
            AppError::InvalidUserId => "INVALID_USER_ID",
            AppError::InvalidUserRole => "INVALID_USER_ROLE",
            AppError::InvalidOtp => "INVALID_OTP",
            AppError::InvalidOtpExpiresAt => "INVALID_OTP_EXPIRES_AT",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::ValidationFailed(_) => "VALIDATION_FAILED",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Short human-readable title for the response body
    pub fn title(&self) -> &'static str {
        match self.status() {
            StatusCode::BAD_REQUEST => "Bad request",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::NOT_FOUND => "Not found",
            StatusCode::CONFLICT => "Conflict",
            _ => "Internal server error",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUserEmail
            | AppError::InvalidUserName
            | AppError::InvalidUserId
            | AppError::InvalidUserRole
            | AppError::InvalidOtp
            | AppError::InvalidOtpExpiresAt
            | AppError::InvalidInput(_)
            | AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::UserAlreadyExists => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> Option<String> {
        match self {
            AppError::Internal { .. } => None,
            _ => Some(self.to_string()),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.title(),
            code: self.code(),
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidUserEmail => AppError::InvalidUserEmail,
            DomainError::InvalidUserName => AppError::InvalidUserName,
            DomainError::InvalidUserRole => AppError::InvalidUserRole,
            DomainError::InvalidOtp => AppError::InvalidOtp,
            DomainError::InvalidOtpExpiresAt => AppError::InvalidOtpExpiresAt,
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationFailed(msg.into())
    }

    pub fn internal(context: impl Into<String>) -> Self {
        AppError::Internal {
            context: context.into(),
            source: None,
        }
    }

    /// Wrap an unexpected failure with context
    pub fn internal_with<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AppError::Internal {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn every_kind_maps_to_one_status() {
        let cases = [
            (AppError::UserNotFound, StatusCode::NOT_FOUND),
            (AppError::UserAlreadyExists, StatusCode::CONFLICT),
            (AppError::InvalidUserEmail, StatusCode::BAD_REQUEST),
            (AppError::InvalidUserName, StatusCode::BAD_REQUEST),
            (AppError::InvalidUserId, StatusCode::BAD_REQUEST),
            (AppError::invalid_input("bad"), StatusCode::BAD_REQUEST),
            (AppError::validation("bad"), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
            (AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err:?}");
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn domain_errors_keep_their_kind() {
        assert!(matches!(
            AppError::from(DomainError::InvalidUserEmail),
            AppError::InvalidUserEmail
        ));
        assert!(matches!(
            AppError::from(DomainError::InvalidUserName),
            AppError::InvalidUserName
        ));
        assert!(matches!(
            AppError::from(DomainError::InvalidOtpExpiresAt),
            AppError::InvalidOtpExpiresAt
        ));
    }

    #[test]
    fn internal_errors_hide_details_but_keep_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = AppError::internal_with("failed to list users", io);

        assert_eq!(err.to_string(), "failed to list users");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("connection reset"));
        assert_eq!(err.user_message(), None);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn client_errors_expose_message() {
        assert_eq!(
            AppError::UserAlreadyExists.user_message().as_deref(),
            Some("user already exists")
        );
        assert_eq!(AppError::UserNotFound.title(), "Not found");
    }
}
