//! Application state for dependency injection.

use std::sync::Arc;

use common::ServerConfig;
use user_service_lib::UserService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub server: ServerConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(user_service: Arc<dyn UserService>, server: ServerConfig) -> Self {
        Self {
            user_service,
            server,
        }
    }
}
