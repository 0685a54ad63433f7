//! Application config, loaded from the environment (after `.env`).

use anyhow::Result;
use dbot_telegram::TelegramConfig;
use llm_client::EnvLlmConfig;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILE: &str = "logs/chat-bot.log";

/// Everything `dbot run` needs.
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub llm: EnvLlmConfig,
    /// Base directory holding the `db/` tree.
    pub data_dir: PathBuf,
    pub log_file: String,
}

impl AppConfig {
    /// Loads config from env. If `token` is provided it overrides BOT_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let telegram = match token {
            Some(token) => TelegramConfig::with_token(token),
            None => TelegramConfig::from_env()?,
        };
        telegram.validate()?;
        let llm = EnvLlmConfig::from_env()?;
        Ok(Self {
            telegram,
            llm,
            data_dir: data_dir_from_env(),
            log_file: log_file_from_env(),
        })
    }
}

/// `DATA_DIR`, defaulting to the working directory.
pub fn data_dir_from_env() -> PathBuf {
    env::var("DATA_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn log_file_from_env() -> String {
    env::var("LOG_FILE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
}
