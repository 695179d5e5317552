//! API configuration.

use std::env;
use std::fmt;
use std::str::FromStr;

use common::{DatabaseConfig, ServerConfig};

/// Where users are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process-local map, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// API configuration.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageBackend,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            storage: env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_storage_backend() {
        assert_eq!("memory".parse(), Ok(StorageBackend::Memory));
        assert_eq!("Postgres".parse(), Ok(StorageBackend::Postgres));
        assert!("redis".parse::<StorageBackend>().is_err());
        assert_eq!(StorageBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn debug_output_hides_database_url() {
        let printed = format!("{:?}", ApiConfig::default());
        assert!(!printed.contains("postgres://"));
    }
}
