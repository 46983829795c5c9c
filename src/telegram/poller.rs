// ABOUTME: Long-polling loop — pulls updates from Telegram and feeds them to the dispatcher.
// ABOUTME: Tracks the getUpdates offset and backs off on transport errors.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::dispatch::{self, Inbound};
use crate::telegram::client::TelegramClient;
use crate::telegram::types::Update;

/// Pause before retrying after a failed poll.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Convert one update into a dispatcher event, if it carries text.
fn inbound_from_update(update: &Update) -> Option<Inbound> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref()?;
    dispatch::parse_inbound(message.chat.id, text)
}

/// Poll getUpdates forever, forwarding events until the dispatcher side
/// of the channel goes away.
pub async fn run_polling(
    client: Arc<TelegramClient>,
    tx: mpsc::Sender<Inbound>,
    poll_timeout_seconds: u64,
) {
    let mut offset: i64 = 0;
    loop {
        match client.get_updates(offset, poll_timeout_seconds).await {
            Ok(updates) => {
                for update in &updates {
                    offset = offset.max(update.update_id + 1);
                    let Some(inbound) = inbound_from_update(update) else {
                        debug!(update_id = update.update_id, "skipping update without usable text");
                        continue;
                    };
                    if tx.send(inbound).await.is_err() {
                        return; // Dispatcher is gone; stop polling.
                    }
                }
            }
            Err(e) => {
                warn!("polling failed, retrying in {}s: {e:#}", ERROR_BACKOFF.as_secs());
                tokio::time::sleep(ERROR_BACKOFF).await;
            }
        }
    }
}
