//! Freebie Notifier CLI
//!
//! Single-shot execution entry point, intended to be scheduled with cron.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use freebie_notifier::{
    error::Result,
    models::Config,
    pipeline,
    services::{DiscordNotifier, EpicStorefront},
    storage::{LocalSnapshotStore, SnapshotStore},
};

/// Epic Games Store free-games Discord notifier
#[derive(Parser, Debug)]
#[command(
    name = "freebie-notifier",
    version,
    about = "Epic Games Store free-games Discord notifier"
)]
struct Cli {
    /// Override the snapshot file path from configuration
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one notification cycle (the default)
    Run,

    /// Validate configuration from the environment
    Validate,

    /// Show current snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Freebie notifier starting...");

    let mut config = Config::from_env()?;
    if let Some(path) = cli.snapshot {
        config.snapshot_path = path;
    }

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            config.validate()?;

            let source = EpicStorefront::new(&config)?;
            let notifier = DiscordNotifier::new(&config)?;
            let store = LocalSnapshotStore::new(&config.snapshot_path);

            let outcome = pipeline::run_cycle(&config, &source, &notifier, &store).await?;
            if outcome.delivery_failures > 0 {
                log::warn!(
                    "{} announcement(s) could not be delivered",
                    outcome.delivery_failures
                );
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            log::info!("✓ Config OK");
            log::info!("  webhook:  {}", config.redacted_webhook());
            log::info!("  snapshot: {}", config.snapshot_path.display());
            log::info!("  region:   {}", config.epic_games_region);
            log::info!("  api:      {}", config.api_url);
        }

        Command::Info => {
            log::info!("Snapshot file: {}", config.snapshot_path.display());

            let store = LocalSnapshotStore::new(&config.snapshot_path);
            let snapshot = store.load().await?;
            if snapshot.is_empty() {
                log::info!("No promotions tracked yet.");
            } else {
                log::info!("Tracking {} promotions:", snapshot.len());
                for record in snapshot.records() {
                    log::info!("  {} (free until {})", record.title, record.end_time);
                }
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
