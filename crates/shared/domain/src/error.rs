//! Domain-level errors.
//!
//! These errors represent business rule violations on the user entity.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// Email is empty or not shaped like `local@domain.tld`
    #[error("invalid user email")]
    InvalidUserEmail,

    /// Name is empty
    #[error("invalid user name")]
    InvalidUserName,

    /// Stored role is not one of the known roles
    #[error("invalid user role")]
    InvalidUserRole,

    /// One-time code is empty or too long
    #[error("invalid OTP")]
    InvalidOtp,

    /// One-time code expiry is not in the future
    #[error("OTP expires at is in the past")]
    InvalidOtpExpiresAt,
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
