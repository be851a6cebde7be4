//! Parking lot CLI — the main entry point.
//!
//! Commands:
//! - `run`      — Process commands from a file or interactively from stdin
//! - `onboard`  — Create the config directory and default config
//! - `status`   — Show configuration and stored occupancy
//! - `history`  — Show all recorded visits of a vehicle (SQLite store)
//! - `config`   — Show, validate or locate the configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "parkinglot",
    about = "Parking lot — slot allocation from a command stream",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process parking lot commands
    Run {
        /// Read commands from this file instead of stdin
        file: Option<PathBuf>,

        /// Keep the lot in memory only, ignoring the configured store
        #[arg(long)]
        ephemeral: bool,
    },

    /// Initialize configuration
    Onboard,

    /// Show configuration and stored lot occupancy
    Status,

    /// Show every recorded visit of a vehicle
    #[cfg(feature = "sqlite")]
    History {
        /// Registration number to look up
        registration_number: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Load and validate the configuration
    Validate,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only command replies.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { file, ephemeral } => commands::run::run(file, ephemeral).await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Status => commands::status::run().await?,
        #[cfg(feature = "sqlite")]
        Commands::History {
            registration_number,
        } => commands::history::run(&registration_number).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}
