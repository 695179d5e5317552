//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{UpdateUser, User};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new user; emails are unique
    async fn create_user(&self, email: &str, name: &str) -> AppResult<User>;

    /// Get user by its textual ID
    async fn get_user_by_id(&self, id: &str) -> AppResult<User>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// Apply a partial update; empty fields are left untouched
    async fn update_user(&self, id: &str, update: UpdateUser) -> AppResult<User>;

    /// Delete user
    async fn delete_user(&self, id: &str) -> AppResult<()>;

    /// List users, newest first
    async fn list_users(&self, limit: u64, offset: u64) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

fn parse_user_id(id: &str) -> AppResult<Uuid> {
    if id.is_empty() {
        return Err(AppError::InvalidUserId);
    }
    Uuid::parse_str(id).map_err(|_| AppError::InvalidUserId)
}

#[async_trait]
impl UserService for UserManager {
    #[instrument(skip(self))]
    async fn create_user(&self, email: &str, name: &str) -> AppResult<User> {
        match self.repo.find_by_email(email).await {
            Ok(_) => {
                tracing::warn!("email already registered");
                return Err(AppError::UserAlreadyExists);
            }
            Err(AppError::UserNotFound) => {}
            Err(err) => return Err(err),
        }

        let mut user = User::new(email, name).map_err(|err| {
            tracing::warn!(error = %err, "rejected new user");
            AppError::from(err)
        })?;

        self.repo.create(&mut user).await?;

        tracing::info!(user_id = ?user.id, "user created");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_user_by_id(&self, id: &str) -> AppResult<User> {
        let id = parse_user_id(id)?;
        self.repo.find_by_id(id).await
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.repo.find_by_email(email).await
    }

    #[instrument(skip(self))]
    async fn update_user(&self, id: &str, update: UpdateUser) -> AppResult<User> {
        let id = parse_user_id(id)?;
        let mut user = self.repo.find_by_id(id).await?;

        if let Some(email) = update.requested_email() {
            user.update_email(email)?;
        }
        if let Some(name) = update.requested_name() {
            user.update_name(name)?;
        }

        self.repo.update(&user).await?;

        tracing::info!(user_id = %id, "user updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: &str) -> AppResult<()> {
        let id = parse_user_id(id)?;
        self.repo.delete(id).await?;

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_users(&self, limit: u64, offset: u64) -> AppResult<Vec<User>> {
        self.repo.list(limit, offset).await
    }
}
