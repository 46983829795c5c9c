// ABOUTME: App orchestrator — wires together the Telegram client, poller, dispatcher, and health server.
// ABOUTME: Spawns the background tasks then runs the dispatch loop until ctrl-c.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::dispatch::{Dispatcher, Inbound, run_dispatch_loop};
use crate::health;
use crate::telegram::{TelegramClient, run_polling};

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
}

impl App {
    /// Create a new app with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the application: resolve the token, spawn the poller and the
    /// optional health server, and drive the dispatch loop.
    pub async fn run(self) -> anyhow::Result<()> {
        // Load local .env if present, so the token can live next to the checkout.
        let _ = dotenvy::dotenv();

        let token = self.config.bot_token()?;
        let client = Arc::new(TelegramClient::new(&token)?);

        if self.config.health.enabled {
            let port = self.config.health.port;
            tokio::spawn(async move {
                if let Err(e) = health::serve(port).await {
                    warn!("liveness endpoint failed: {e:#}");
                }
            });
        }

        // Channel between the transport poller and the dispatcher.
        let (tx, rx) = mpsc::channel::<Inbound>(64);

        let poll_timeout = self.config.telegram.poll_timeout_seconds;
        let poller = tokio::spawn(run_polling(client.clone(), tx, poll_timeout));

        let dispatcher = Dispatcher::new(client);
        info!("clockout is polling for updates");

        tokio::select! {
            _ = run_dispatch_loop(dispatcher, rx) => {
                // Poller dropped its sender; nothing left to do.
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
            }
        }

        poller.abort();
        Ok(())
    }
}
