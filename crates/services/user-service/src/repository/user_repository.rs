//! User repository trait and its PostgreSQL implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, active_model, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Absence is reported as [`AppError::UserNotFound`]; implementations never
/// return a "found nothing" success.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user and write the assigned id back into it
    async fn create(&self, user: &mut User) -> AppResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<User>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<User>;

    /// Overwrite every mutable column of a persisted user
    async fn update(&self, user: &User) -> AppResult<()>;

    /// Delete user by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// List users, newest first
    async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn storage_error(context: &'static str, err: DbErr) -> AppError {
    tracing::error!(error = %err, "{}", context);
    AppError::internal_with(context, err)
}

/// Map a write failure, turning a unique-index hit on email into a conflict.
fn write_error(context: &'static str, err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UserAlreadyExists,
        _ => storage_error(context, err),
    }
}

fn into_user(model: user::Model) -> AppResult<User> {
    let id = model.id;
    User::try_from(model).map_err(|err| {
        tracing::error!(user_id = %id, error = %err, "corrupt user row");
        AppError::internal_with(format!("corrupt user row {}", id), err)
    })
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, user: &mut User) -> AppResult<()> {
        let id = Uuid::new_v4();

        active_model(user, id)
            .insert(&self.db)
            .await
            .map_err(|err| write_error("failed to create user", err))?;

        user.id = Some(id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|err| storage_error("failed to get user by ID", err))?
            .ok_or(AppError::UserNotFound)?;

        into_user(model)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|err| storage_error("failed to get user by email", err))?
            .ok_or(AppError::UserNotFound)?;

        into_user(model)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let id = user.id.ok_or(AppError::InvalidUserId)?;

        let mut active = active_model(user, id);
        // Identity and creation time are immutable
        active.id = sea_orm::ActiveValue::NotSet;
        active.created_at = sea_orm::ActiveValue::NotSet;

        let result = UserEntity::update_many()
            .set(active)
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|err| write_error("failed to update user", err))?;

        if result.rows_affected == 0 {
            return Err(AppError::UserNotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|err| storage_error("failed to delete user", err))?;

        if result.rows_affected == 0 {
            return Err(AppError::UserNotFound);
        }

        Ok(())
    }

    async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|err| storage_error("failed to list users", err))?;

        models.into_iter().map(into_user).collect()
    }
}
