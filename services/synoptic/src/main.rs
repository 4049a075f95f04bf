//! Synoptic CLI
//!
//! Headless operator console for the apparatus diagram: mirrors live state,
//! submits toggles, and replays history.

use std::path::PathBuf;

use clap::Parser;
use synoptic::session::Mode;
use synoptic::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "synoptic")]
#[command(about = "Apparatus state synchronization and history replay console")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Run the history view instead of the live view
    #[arg(long)]
    history: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(backend_url) = args.backend_url {
        config.backend_url = backend_url;
    }
    if args.history {
        config.mode = Mode::History;
    }

    tracing::info!(
        "Starting synoptic ({:?} mode) against {}",
        config.mode,
        config.backend_url
    );

    synoptic::run(config).await?;

    Ok(())
}
