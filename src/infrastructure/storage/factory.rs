//! Repository wiring for the configured storage backend

use std::sync::Arc;

use sqlx::postgres::PgPool;

use crate::domain::address::AddressRepository;
use crate::domain::allowed_domain::AllowedDomainRepository;
use crate::domain::usage::UsageRepository;
use crate::domain::user::UserRepository;
use crate::infrastructure::address::{InMemoryAddressRepository, PostgresAddressRepository};
use crate::infrastructure::allowed_domain::{
    InMemoryAllowedDomainRepository, PostgresAllowedDomainRepository,
};
use crate::infrastructure::usage::{InMemoryUsageRepository, PostgresUsageRepository};
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

/// The full set of repositories backing the API
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub addresses: Arc<dyn AddressRepository>,
    pub domains: Arc<dyn AllowedDomainRepository>,
    pub usage: Arc<dyn UsageRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            addresses: Arc::new(InMemoryAddressRepository::new()),
            domains: Arc::new(InMemoryAllowedDomainRepository::new()),
            usage: Arc::new(InMemoryUsageRepository::default()),
        }
    }

    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            addresses: Arc::new(PostgresAddressRepository::new(pool.clone())),
            domains: Arc::new(PostgresAllowedDomainRepository::new(pool.clone())),
            usage: Arc::new(PostgresUsageRepository::new(pool)),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories")
            .field("users", &self.users)
            .field("addresses", &self.addresses)
            .field("domains", &self.domains)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_repositories_start_empty() {
        let repos = Repositories::in_memory();

        assert_eq!(repos.users.count().await.unwrap(), 0);
        assert_eq!(repos.addresses.count().await.unwrap(), 0);
    }
}
