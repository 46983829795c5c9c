// ABOUTME: Telegram transport module — Bot API client, payload types, and the polling loop.
// ABOUTME: Everything conversational lives elsewhere; this is wire plumbing only.

pub mod client;
pub mod poller;
pub mod types;

pub use client::TelegramClient;
pub use poller::run_polling;
