// ABOUTME: Library root for clockout — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod config;
pub mod dialogue;
pub mod dispatch;
pub mod health;
pub mod telegram;
pub mod workday;
