// ABOUTME: Entry point for clockout — a Telegram bot that computes your end-of-workday time.
// ABOUTME: Parses CLI args, initializes logging, loads config, and launches the app.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clockout::app::App;
use clockout::config::Config;

#[derive(Debug, Parser)]
#[command(name = "clockout", about = "Telegram bot that tells you when to leave work")]
struct Cli {
    /// Path to a config file (defaults to ~/.clockout/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "clockout=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    App::new(config).run().await
}
