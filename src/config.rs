//! # Configuration Module
//!
//! Startup settings read from the environment (a `.env` file is merged in
//! by `main` before loading).

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://assets/storage.db";
pub const DEFAULT_ACTIVITY_LOG_PATH: &str = "logs/telegram/telegramUsersUse.txt";

/// Diagnostic log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Bot configuration
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Telegram bot token
    pub telegram_token: String,
    /// Telegram user id of the only user allowed to add products
    pub admin_id: u64,
    pub database_url: String,
    pub activity_log_path: PathBuf,
    pub log_format: LogFormat,
}

// Hand-written so the token never ends up in logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_token", &"<redacted>")
            .field("admin_id", &self.admin_id)
            .field("database_url", &self.database_url)
            .field("activity_log_path", &self.activity_log_path)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let telegram_token = non_empty("TELEGRAM_TOKEN")
            .ok_or_else(|| anyhow!("TELEGRAM_TOKEN must be set"))?;

        let admin_id = non_empty("TELEGRAM_ID")
            .ok_or_else(|| anyhow!("TELEGRAM_ID must be set to the administrator's Telegram user id"))?
            .trim()
            .parse::<u64>()
            .context("TELEGRAM_ID must be a numeric Telegram user id")?;

        let database_url =
            non_empty("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let activity_log_path = non_empty("ACTIVITY_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ACTIVITY_LOG_PATH));

        let log_format = match non_empty("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(anyhow!("LOG_FORMAT must be 'text' or 'json', got '{other}'")),
        };

        Ok(Self {
            telegram_token,
            admin_id,
            database_url,
            activity_log_path,
            log_format,
        })
    }
}
