//! CLI module for the NL Address API
//!
//! Subcommands:
//! - `serve`: run the HTTP API (default)
//! - `migrate`: apply or revert PostgreSQL schema migrations
//! - `seed`: insert random sample addresses

pub mod migrate;
pub mod seed;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// NL Address API - Dutch address lookups with API-key admission control
#[derive(Debug, Parser)]
#[command(name = "nl-address-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Apply pending PostgreSQL migrations
    Migrate(migrate::MigrateArgs),

    /// Insert random Dutch sample addresses
    Seed(seed::SeedArgs),
}

/// Load `.env` and the layered configuration
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    Ok(AppConfig::load()?)
}
