use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use freebie_common::{FreebieConfig, RunMode};
use freebie_scout::{
    notify::{DiscordBackend, NoopBackend, NotifyBackend},
    scout::Scout,
    seen::SeenStore,
    sources,
};

#[derive(Parser)]
#[command(name = "freebie-scout", about = "Announces Steam games that are temporarily free")]
struct Cli {
    /// Run a single check and exit (same as RUN_ONCE=true)
    #[arg(long)]
    once: bool,

    /// Seen-set file (overrides SEEN_FILE)
    #[arg(long)]
    seen_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("Steam freebie scout starting...");

    // Load config
    let mut config = FreebieConfig::from_env()?;
    if cli.once {
        config.run_mode = RunMode::Once;
    }
    if let Some(path) = cli.seen_file {
        config.seen_file = path;
    }
    config.log_redacted();

    // Build notification backend: Discord if configured, otherwise Noop
    let notifier: Box<dyn NotifyBackend> = match config.discord_webhook_url.as_deref() {
        Some(url) => {
            info!("Discord notifications enabled");
            Box::new(DiscordBackend::new(url))
        }
        None => {
            info!("No DISCORD_WEBHOOK_URL set, notifications disabled");
            Box::new(NoopBackend)
        }
    };

    let seen = SeenStore::load(&config.seen_file)?;
    info!(entries = seen.len(), "Loaded seen-set");

    let mut scout = Scout::new(&config, sources::default_sources(&config), notifier, seen);
    scout.run().await?;

    info!("Steam freebie scout finished");
    Ok(())
}
