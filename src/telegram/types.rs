// ABOUTME: Serde types for the slice of the Telegram Bot API payload the bot consumes.
// ABOUTME: Only update_id, message.text, and message.chat.id matter; everything else is ignored.

use serde::Deserialize;

/// Envelope every Bot API method returns.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// One entry from getUpdates. Non-message updates arrive with
/// `message: None` and are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}
