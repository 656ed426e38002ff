//! autorip - Automatic optical disc ripper
//!
//! Meant to be started by a udev rule when a disc is inserted.
//!
//! # Usage
//!
//! ```bash
//! autorip rip --devpath /dev/sr0
//! autorip identify --devpath /dev/sr0
//! autorip lookup --label THE_MATRIX
//! autorip status --devpath /dev/sr0
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use autorip::adapters::tracing_log::init_tracing;
use autorip::app::container::DefaultAppContainer;
use autorip::cli::{commands, Cli, Commands};
use autorip::config_initialization::initialize_configuration_hierarchy;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;
    init_tracing(&config.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting autorip");
    config.log_summary();

    let container = DefaultAppContainer::new(Arc::new(config))?;

    let result = match &cli.command {
        Commands::Rip(args) => {
            info!(device = %args.devpath, "Executing rip command");
            commands::execute_rip_command(&container, args).await
        }
        Commands::Identify(args) => commands::execute_identify_command(&container, args).await,
        Commands::Lookup(args) => commands::execute_lookup_command(&container, args).await,
        Commands::Status(args) => commands::execute_status_command(&container, args).await,
    };

    if let Err(e) = &result {
        error!(error = %e, "autorip finished with an error");
    }
    result?;
    Ok(())
}
