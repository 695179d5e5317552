//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{EMAIL_PATTERN, MAX_OTP_LENGTH, MIN_NAME_LENGTH, ROLE_ADMIN, ROLE_USER};
use crate::error::{DomainError, DomainResult};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

/// User roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Storage representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::User => ROLE_USER,
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_USER => Ok(UserRole::User),
            _ => Err(DomainError::InvalidUserRole),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity.
///
/// Construct with [`User::new`], mutate through the `update_*` methods so
/// that validation and the `updated_at` bump always happen together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by storage on creation; `None` until persisted
    pub id: Option<Uuid>,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub is_email_verified: bool,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, not yet persisted user with the default role.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> DomainResult<Self> {
        let email = email.into();
        let name = name.into();

        if !Self::is_valid_email(&email) {
            return Err(DomainError::InvalidUserEmail);
        }
        if !Self::is_valid_name(&name) {
            return Err(DomainError::InvalidUserName);
        }

        let now = Utc::now();
        Ok(Self {
            id: None,
            email,
            name,
            role: UserRole::User,
            is_email_verified: false,
            is_active: true,
            otp: None,
            otp_expires_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Check an email against the `local@domain.tld` shape.
    pub fn is_valid_email(email: &str) -> bool {
        !email.is_empty() && EMAIL_RE.is_match(email)
    }

    fn is_valid_name(name: &str) -> bool {
        name.chars().count() >= MIN_NAME_LENGTH
    }

    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether storage has assigned an id yet
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Update user's email. Leaves the entity untouched on error.
    pub fn update_email(&mut self, email: impl Into<String>) -> DomainResult<()> {
        let email = email.into();
        if !Self::is_valid_email(&email) {
            return Err(DomainError::InvalidUserEmail);
        }
        self.email = email;
        self.touch();
        Ok(())
    }

    /// Update user's name. Leaves the entity untouched on error.
    pub fn update_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        if !Self::is_valid_name(&name) {
            return Err(DomainError::InvalidUserName);
        }
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Assign a one-time code. The expiry must lie in the future.
    pub fn set_otp(&mut self, code: impl Into<String>, expires_at: DateTime<Utc>) -> DomainResult<()> {
        let code = code.into();
        if code.is_empty() || code.len() > MAX_OTP_LENGTH {
            return Err(DomainError::InvalidOtp);
        }
        if expires_at <= Utc::now() {
            return Err(DomainError::InvalidOtpExpiresAt);
        }
        self.otp = Some(code);
        self.otp_expires_at = Some(expires_at);
        self.touch();
        Ok(())
    }

    /// Drop any assigned one-time code
    pub fn clear_otp(&mut self) {
        self.otp = None;
        self.otp_expires_at = None;
        self.touch();
    }

    // Strictly monotonic even when the clock has not ticked since the last write.
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// Partial update request. `None` and `Some("")` both mean "leave as is".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UpdateUser {
    pub fn requested_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }

    pub fn requested_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Option<Uuid>,
    /// User email address
    pub email: String,
    /// User display name
    pub name: String,
    /// User role
    pub role: UserRole,
    pub is_email_verified: bool,
    pub is_active: bool,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            is_email_verified: user.is_email_verified,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self::from(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stale_user() -> User {
        let an_hour_ago = Utc::now() - Duration::hours(1);
        User {
            id: Some(Uuid::new_v4()),
            email: "old@example.com".to_string(),
            name: "Old Name".to_string(),
            role: UserRole::User,
            is_email_verified: false,
            is_active: true,
            otp: None,
            otp_expires_at: None,
            created_at: an_hour_ago,
            updated_at: an_hour_ago,
        }
    }

    #[test]
    fn new_user_has_defaults_and_equal_timestamps() {
        let user = User::new("test@example.com", "Test User").unwrap();

        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, "Test User");
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);
        assert!(!user.is_email_verified);
        assert!(user.otp.is_none());
        assert!(!user.is_persisted());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn new_user_rejects_bad_email() {
        assert_eq!(
            User::new("invalid-email", "Test User").unwrap_err(),
            DomainError::InvalidUserEmail
        );
        assert_eq!(
            User::new("", "Test User").unwrap_err(),
            DomainError::InvalidUserEmail
        );
    }

    #[test]
    fn new_user_rejects_empty_name() {
        assert_eq!(
            User::new("test@example.com", "").unwrap_err(),
            DomainError::InvalidUserName
        );
    }

    #[test]
    fn email_validation() {
        let valid = [
            "test@example.com",
            "user@mail.example.com",
            "user123@example123.com",
            "user+test@example.com",
        ];
        for email in valid {
            assert!(User::is_valid_email(email), "{email} should be valid");
        }

        let invalid = [
            "userexample.com",
            "user@",
            "@example.com",
            "user@example",
            "",
            "user @example.com",
            "user@exa mple.com",
            "user@@example.com",
            "a@b@example.com",
            "user@example.com\n",
        ];
        for email in invalid {
            assert!(!User::is_valid_email(email), "{email:?} should be invalid");
        }
    }

    #[test]
    fn update_email_applies_and_bumps_timestamp() {
        let mut user = stale_user();
        let before = user.updated_at;

        user.update_email("new@example.com").unwrap();

        assert_eq!(user.email, "new@example.com");
        assert!(user.updated_at > before);
    }

    #[test]
    fn update_email_rejects_without_partial_apply() {
        let mut user = stale_user();
        let before = user.updated_at;

        for bad in ["invalid-email", ""] {
            assert_eq!(user.update_email(bad), Err(DomainError::InvalidUserEmail));
            assert_eq!(user.email, "old@example.com");
            assert_eq!(user.updated_at, before);
        }
    }

    #[test]
    fn update_name_rejects_empty() {
        let mut user = stale_user();
        let before = user.updated_at;

        assert_eq!(user.update_name(""), Err(DomainError::InvalidUserName));
        assert_eq!(user.name, "Old Name");
        assert_eq!(user.updated_at, before);

        user.update_name("New Name").unwrap();
        assert_eq!(user.name, "New Name");
        assert!(user.updated_at > before);
    }

    #[test]
    fn back_to_back_updates_strictly_increase_updated_at() {
        let mut user = User::new("test@example.com", "Test User").unwrap();
        let created = user.created_at;

        user.update_name("A").unwrap();
        let first = user.updated_at;
        user.update_name("B").unwrap();

        assert!(first > created);
        assert!(user.updated_at > first);
        assert!(user.updated_at >= user.created_at);
    }

    #[test]
    fn otp_requires_future_expiry() {
        let mut user = stale_user();

        assert_eq!(
            user.set_otp("123456", Utc::now() - Duration::minutes(1)),
            Err(DomainError::InvalidOtpExpiresAt)
        );
        assert_eq!(
            user.set_otp("", Utc::now() + Duration::minutes(5)),
            Err(DomainError::InvalidOtp)
        );
        assert!(user.otp.is_none());

        let expires = Utc::now() + Duration::minutes(5);
        user.set_otp("123456", expires).unwrap();
        assert_eq!(user.otp.as_deref(), Some("123456"));
        assert_eq!(user.otp_expires_at, Some(expires));

        user.clear_otp();
        assert!(user.otp.is_none());
        assert!(user.otp_expires_at.is_none());
    }

    #[test]
    fn role_parsing_is_strict() {
        assert_eq!("admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!("user".parse::<UserRole>(), Ok(UserRole::User));
        assert_eq!("root".parse::<UserRole>(), Err(DomainError::InvalidUserRole));
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(String::from(UserRole::User), "user");
    }

    #[test]
    fn update_request_treats_empty_as_unset() {
        let req = UpdateUser {
            email: Some(String::new()),
            name: Some("Updated".to_string()),
        };
        assert_eq!(req.requested_email(), None);
        assert_eq!(req.requested_name(), Some("Updated"));
        assert_eq!(UpdateUser::default().requested_name(), None);
    }

    #[test]
    fn response_hides_otp() {
        let mut user = stale_user();
        user.set_otp("654321", Utc::now() + Duration::minutes(5)).unwrap();

        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();
        assert!(json.contains("old@example.com"));
        assert!(!json.contains("654321"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
