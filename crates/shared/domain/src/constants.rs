//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "user";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN];

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: usize = 1;

/// Shape accepted for email addresses: `local@domain.tld`, no whitespace,
/// exactly one `@`.
pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Maximum length of a one-time code
pub const MAX_OTP_LENGTH: usize = 16;

// =============================================================================
// Pagination
// =============================================================================

/// Page size used when the caller supplies none (or garbage)
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum allowed page size to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Offset used when the caller supplies none (or garbage)
pub const DEFAULT_PAGE_OFFSET: u64 = 0;
