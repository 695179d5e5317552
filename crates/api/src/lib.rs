//! User API Library
//!
//! HTTP REST surface over the user service: routing, request extraction,
//! error-to-status mapping and server lifecycle.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::Notify;
use tracing::{info, warn};

use user_service_lib::infra::Database;
use user_service_lib::{InMemoryUserRepository, UserManager, UserRepository, UserStore};

use crate::config::{ApiConfig, StorageBackend};
use crate::routes::create_router;
use crate::state::AppState;

/// Build the repository selected by `config.storage`.
///
/// The database variant verifies connectivity and applies migrations first.
async fn build_repository(
    config: &ApiConfig,
) -> Result<Arc<dyn UserRepository>, Box<dyn std::error::Error>> {
    match config.storage {
        StorageBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            Ok(Arc::new(UserStore::new(db.get_connection())))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
    }
}

/// Run the HTTP server until SIGINT/SIGTERM.
pub async fn run(config: ApiConfig) -> Result<(), Box<dyn std::error::Error>> {
    let repo = build_repository(&config).await?;
    let user_service = Arc::new(UserManager::new(repo));

    let state = AppState::new(user_service, config.server.clone());
    let app = create_router(state);

    let addr: SocketAddr = config.server.addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        storage = %config.storage,
        environment = %config.server.environment,
        "User API listening on http://{}",
        addr
    );

    let signalled = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let signalled = signalled.clone();
            async move {
                shutdown_signal().await;
                signalled.notify_one();
            }
        })
        .into_future();

    let grace = Duration::from_secs(config.server.shutdown_grace_secs);
    tokio::select! {
        result = server => result?,
        _ = async {
            signalled.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_secs = grace.as_secs(), "Grace period elapsed, dropping in-flight requests");
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
