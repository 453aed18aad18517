//! nebius — chat with Nebius AI Studio from the terminal.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_store = nebius_core::ConfigStore::new();
    config_store.hydrate_env();
    let config = config_store.load();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("nebius=debug,nebius_core=debug,nebius_provider=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Models => {
            let vendor = commands::create_vendor(&cli, &config)?;
            commands::models::run(vendor.as_ref(), &mut std::io::stdout()).await?;
        }
        Commands::Send(args) => {
            let vendor = commands::create_vendor(&cli, &config)?;
            commands::send::run(vendor, args, &config.defaults).await?;
        }
        Commands::Setup { model_prefixes } => {
            let vendor = commands::vendor_name(&cli, &config);
            let values = commands::setup::SetupValues {
                api_key: cli.api_key.clone(),
                base_url: cli.base_url.clone(),
                model_prefixes: model_prefixes.clone(),
            };
            commands::setup::run(&config_store, &vendor, values, &mut std::io::stdout())?;
        }
    }

    Ok(())
}
