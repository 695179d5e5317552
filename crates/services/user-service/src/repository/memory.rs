//! In-memory user repository (for development/testing).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserRepository;
use common::{AppError, AppResult};
use domain::User;

/// In-memory implementation of UserRepository.
///
/// Mirrors the database constraints: email is unique, writes to a missing id
/// fail with `UserNotFound`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &mut User) -> AppResult<()> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::UserAlreadyExists);
        }

        let id = Uuid::new_v4();
        user.id = Some(id);
        users.insert(id, user.clone());

        tracing::debug!(user_id = %id, "Stored user in memory");
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        let users = self.users.read().await;
        users.get(&id).cloned().ok_or(AppError::UserNotFound)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AppError::UserNotFound)
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let id = user.id.ok_or(AppError::InvalidUserId)?;
        let mut users = self.users.write().await;

        let created_at = match users.get(&id) {
            Some(existing) => existing.created_at,
            None => return Err(AppError::UserNotFound),
        };

        if users.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(AppError::UserAlreadyExists);
        }

        let mut stored = user.clone();
        stored.created_at = created_at;
        users.insert(id, stored);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut users = self.users.write().await;
        users.remove(&id).map(|_| ()).ok_or(AppError::UserNotFound)
    }

    async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();
        // Equal timestamps fall back to id so pages never overlap
        result.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(result
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}
