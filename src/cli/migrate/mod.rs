//! Migrate command - manages the PostgreSQL schema

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::storage::{connect_pool, Migrator, PostgresMigrator};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Revert the most recent migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

pub async fn run(config: AppConfig, args: MigrateArgs) -> anyhow::Result<()> {
    init_logging(&config.logging);

    let url = config
        .storage
        .database_url
        .as_deref()
        .context("storage.database_url (or DATABASE_URL) is required to migrate")?;

    let pool = connect_pool(url, 1).await?;
    let migrator = PostgresMigrator::new(pool);

    if args.revert {
        migrator.revert().await?;
    } else {
        migrator.run().await?;
    }

    info!(version = ?migrator.version().await?, "Schema is up to date");
    Ok(())
}
