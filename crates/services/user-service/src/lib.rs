//! User Service Library
//!
//! Business rules for user accounts on top of a pluggable repository:
//! a SeaORM/PostgreSQL store for production and an in-memory store for
//! development and tests.

pub mod infra;
pub mod repository;
pub mod service;

use common::DatabaseConfig;
use sea_orm::DbErr;
use tracing::info;

use crate::infra::Database;

pub use repository::{InMemoryUserRepository, UserRepository, UserStore};
pub use service::{UserManager, UserService};

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &DatabaseConfig, action: MigrateAction) -> Result<(), DbErr> {
    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    db.close().await
}
