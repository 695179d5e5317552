//! Shared configuration structures.
//!
//! Every struct is built once at startup (`from_env` or `Default`) and then
//! passed down explicitly; nothing reads the environment afterwards.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Database configuration.
#[derive(Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    /// Connections older than this are recycled
    pub max_lifetime_secs: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .finish()
    }
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// `DATABASE_URL` wins; otherwise the URL is assembled from the
    /// individual `DB_*` variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            Self::compose_url(
                &env_string_or("DB_HOST", "localhost"),
                env_or("DB_PORT", 5432),
                &env_string_or("DB_USER", "postgres"),
                &env_string_or("DB_PASSWORD", "postgres"),
                &env_string_or("DB_NAME", "users"),
                &env_string_or("DB_SSLMODE", "disable"),
            )
        });

        Self {
            url,
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", defaults.max_lifetime_secs),
        }
    }

    /// Build a postgres URL from its parts.
    pub fn compose_url(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        db_name: &str,
        ssl_mode: &str,
    ) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            user, password, host, port, db_name, ssl_mode
        )
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::compose_url("localhost", 5432, "postgres", "postgres", "users", "disable"),
            max_connections: 25,
            min_connections: 5,
            connect_timeout_secs: 10,
            max_lifetime_secs: 300,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Requests running longer than this are answered with 408
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests on shutdown
    pub shutdown_grace_secs: u64,
    /// Deployment environment (`development`, `production`, ...)
    pub environment: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_string_or("SERVER_HOST", &defaults.host),
            port: env_or("SERVER_PORT", defaults.port),
            request_timeout_secs: env_or("SERVER_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            shutdown_grace_secs: env_or("SERVER_SHUTDOWN_GRACE_SECS", defaults.shutdown_grace_secs),
            environment: env_string_or("APP_ENV", &defaults.environment),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Get the full server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 15,
            shutdown_grace_secs: 30,
            environment: "production".to_string(),
        }
    }
}
