//! Storage infrastructure - backend selection, connection pooling and migrations

mod factory;
pub mod migrations;

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::DomainError;

pub use factory::Repositories;
pub use migrations::{run_schema_migrations, Migration, Migrator, PostgresMigrator};

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    Postgres,
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

/// Open a PostgreSQL connection pool
pub async fn connect_pool(url: &str, max_connections: u32) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse(), Ok(StorageType::InMemory));
        assert_eq!("In-Memory".parse(), Ok(StorageType::InMemory));
        assert_eq!("postgres".parse(), Ok(StorageType::Postgres));
        assert_eq!("pg".parse(), Ok(StorageType::Postgres));
        assert!("redis".parse::<StorageType>().is_err());
    }
}
