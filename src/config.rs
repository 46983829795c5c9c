// ABOUTME: Configuration loading for clockout.
// ABOUTME: Reads ~/.clockout/config.toml; the bot token comes from the environment or the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable holding the bot token. Takes precedence over the
/// config file so hosting platforms can inject the credential.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub health: HealthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            health: HealthConfig::default(),
        }
    }
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub poll_timeout_seconds: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            poll_timeout_seconds: 50,
        }
    }
}

/// Liveness endpoint configuration. Off by default; hosting platforms
/// that probe for health turn it on.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 8080,
        }
    }
}

impl Config {
    /// Load config from ~/.clockout/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path, falling back to defaults when
    /// the file does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".clockout")
            .join("config.toml")
    }

    /// Resolve the bot token: environment first, then the config file.
    pub fn bot_token(&self) -> anyhow::Result<String> {
        let env_token = std::env::var(TOKEN_ENV_VAR).ok();
        resolve_token(env_token, self.telegram.token.clone())
    }
}

/// Pick the token from the environment value or the config value.
fn resolve_token(env: Option<String>, config: Option<String>) -> anyhow::Result<String> {
    env.filter(|t| !t.is_empty())
        .or(config.filter(|t| !t.is_empty()))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no bot token configured: set {TOKEN_ENV_VAR} or telegram.token in config.toml"
            )
        })
}
