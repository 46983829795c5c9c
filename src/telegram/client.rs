// ABOUTME: Minimal Telegram Bot API client — long-polling getUpdates plus sendMessage.
// ABOUTME: Implements Responder so the dispatcher can reply through it.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use crate::dispatch::{ChatId, Responder};
use crate::telegram::types::{ApiResponse, Update};

const API_BASE: &str = "https://api.telegram.org";

/// Slack added on top of the long-poll timeout before the HTTP request
/// itself is considered hung.
const POLL_GRACE_SECONDS: u64 = 10;
const SEND_TIMEOUT_SECONDS: u64 = 15;

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    /// Build a client for the given bot token.
    pub fn new(token: &str) -> anyhow::Result<Self> {
        Self::with_base_url(token, API_BASE)
    }

    /// Build a client against a non-default API host (for testing).
    pub fn with_base_url(token: &str, base: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: format!("{}/bot{}", base.trim_end_matches('/'), token),
        })
    }

    /// Long-poll for updates newer than `offset`. Blocks server-side for
    /// up to `timeout_seconds` when no updates are pending.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_seconds: u64,
    ) -> anyhow::Result<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": timeout_seconds,
            "allowed_updates": ["message"],
        });
        let response = self
            .http
            .post(format!("{}/getUpdates", self.base_url))
            .timeout(Duration::from_secs(timeout_seconds + POLL_GRACE_SECONDS))
            .json(&body)
            .send()
            .await
            .context("getUpdates request failed")?;
        let payload: ApiResponse<Vec<Update>> = response
            .json()
            .await
            .context("getUpdates returned malformed JSON")?;
        if !payload.ok {
            anyhow::bail!(
                "getUpdates rejected: {}",
                payload.description.as_deref().unwrap_or("no description")
            );
        }
        Ok(payload.result.unwrap_or_default())
    }

    /// Send a plain-text message to a chat.
    pub async fn send_message(&self, chat_id: ChatId, text: &str) -> anyhow::Result<()> {
        let body = json!({ "chat_id": chat_id, "text": text });
        let response = self
            .http
            .post(format!("{}/sendMessage", self.base_url))
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECONDS))
            .json(&body)
            .send()
            .await
            .context("sendMessage request failed")?;
        let payload: ApiResponse<serde_json::Value> = response
            .json()
            .await
            .context("sendMessage returned malformed JSON")?;
        if !payload.ok {
            anyhow::bail!(
                "sendMessage rejected: {}",
                payload.description.as_deref().unwrap_or("no description")
            );
        }
        Ok(())
    }
}

#[async_trait]
impl Responder for TelegramClient {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> anyhow::Result<()> {
        self.send_message(chat_id, text).await
    }
}
