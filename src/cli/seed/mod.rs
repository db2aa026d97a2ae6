//! Seed command - fills the address table with random sample data

use clap::Args;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::address::{seed_addresses, AddressGenerator};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::StorageType;

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Number of addresses to insert
    #[arg(long, default_value_t = 1000)]
    pub count: usize,

    /// Seed for the random generator, for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,
}

pub async fn run(config: AppConfig, args: SeedArgs) -> anyhow::Result<()> {
    init_logging(&config.logging);

    if config.storage.storage_type().map_err(anyhow::Error::msg)? == StorageType::InMemory {
        anyhow::bail!("Seeding needs persistent storage. Set storage.backend to postgres.");
    }

    let repositories = crate::create_repositories(&config).await?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut generator = AddressGenerator::new(rng);

    let inserted = seed_addresses(repositories.addresses.as_ref(), &mut generator, args.count).await?;
    let total = repositories.addresses.count().await?;

    info!(inserted, total, "Seeding complete");
    Ok(())
}
