use clap::Parser;
use nl_address_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::load_config()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run(config).await,
        Command::Migrate(args) => cli::migrate::run(config, args).await,
        Command::Seed(args) => cli::seed::run(config, args).await,
    }
}
