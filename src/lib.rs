//! NL Address API
//!
//! Dutch address lookups behind API-key admission control:
//! - API keys issued at registration, stored hashed
//! - Monthly request quotas per subscription plan, reset each calendar month
//! - Per-second rate limits per plan
//! - Optional per-account allow-lists of calling domains

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use api::state::AppState;
use infrastructure::{
    address::{seed_addresses, AddressGenerator, AddressLookupService},
    admission::AdmissionService,
    allowed_domain::AllowedDomainService,
    api_key::{ApiKeyGenerator, RateLimiter},
    auth::{JwtConfig, JwtService},
    storage::{connect_pool, run_schema_migrations, Repositories, StorageType},
    user::{Argon2Hasher, UserService},
};

/// Create the application state for the configured storage backend
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let repositories = create_repositories(config).await?;

    if config.storage.seed_addresses > 0 && repositories.addresses.count().await? == 0 {
        let mut generator = AddressGenerator::new(StdRng::from_entropy());
        let inserted = seed_addresses(
            repositories.addresses.as_ref(),
            &mut generator,
            config.storage.seed_addresses,
        )
        .await?;
        info!(inserted, "Seeded sample addresses");
    }

    build_app_state(config, repositories)
}

/// Open the configured storage. PostgreSQL is migrated before use.
pub async fn create_repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    let backend = config
        .storage
        .storage_type()
        .map_err(anyhow::Error::msg)?;

    info!(backend = ?backend, "Initializing storage");

    match backend {
        StorageType::InMemory => Ok(Repositories::in_memory()),
        StorageType::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .context("storage.database_url (or DATABASE_URL) is required for postgres")?;

            let pool = connect_pool(url, config.storage.max_connections).await?;
            info!("PostgreSQL connection established");

            run_schema_migrations(&pool).await?;

            Ok(Repositories::postgres(pool))
        }
    }
}

/// Wire services over a set of repositories
pub fn build_app_state(config: &AppConfig, repositories: Repositories) -> anyhow::Result<AppState> {
    let hasher = Argon2Hasher::with_cost(
        config.auth.password_memory_kib,
        config.auth.password_iterations,
    )?;

    let user_service = UserService::new(
        repositories.users.clone(),
        Arc::new(hasher),
        ApiKeyGenerator::new(config.auth.api_key_prefix.clone()),
    );
    let domain_service = AllowedDomainService::new(repositories.domains.clone());
    let admission_service = AdmissionService::new(
        user_service.clone(),
        domain_service.clone(),
        repositories.usage.clone(),
        Arc::new(RateLimiter::new()),
    );
    let jwt_service = JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    ));

    Ok(AppState {
        user_service,
        domain_service,
        address_service: AddressLookupService::new(repositories.addresses.clone()),
        admission_service,
        usage_repository: repositories.usage,
        jwt_service: Arc::new(jwt_service),
    })
}
