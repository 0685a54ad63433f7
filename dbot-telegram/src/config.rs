//! Telegram connectivity config: bot token and optional Bot API URL.
//! Loaded from `BOT_TOKEN` and `TELEGRAM_API_URL` (or `TELOXIDE_API_URL`).

use anyhow::{Context, Result};
use std::env;

pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
}

impl TelegramConfig {
    /// `BOT_TOKEN` is required; the API URL is optional.
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").context("BOT_TOKEN not set")?;
        Ok(Self {
            bot_token,
            telegram_api_url: Self::api_url_from_env(),
        })
    }

    /// Uses the given token; the API URL still comes from the environment.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: Self::api_url_from_env(),
        }
    }

    fn api_url_from_env() -> Option<String> {
        env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok()
            .filter(|s| !s.trim().is_empty())
    }

    /// Rejects an empty token and a malformed API URL.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(url) = &self.telegram_api_url {
            reqwest::Url::parse(url)
                .with_context(|| format!("Invalid TELEGRAM_API_URL: {}", url))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var("BOT_TOKEN");
        env::remove_var("TELEGRAM_API_URL");
        env::remove_var("TELOXIDE_API_URL");
    }

    #[test]
    #[serial]
    fn test_from_env_requires_token() {
        clear_env();
        assert!(TelegramConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_falls_back_to_teloxide_url() {
        clear_env();
        env::set_var("BOT_TOKEN", "123:abc");
        env::set_var("TELOXIDE_API_URL", "http://localhost:8081");

        let config = TelegramConfig::from_env().unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(
            config.telegram_api_url.as_deref(),
            Some("http://localhost:8081")
        );
        assert!(config.validate().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_with_token() {
        clear_env();
        let config = TelegramConfig::with_token("test_token".to_string());
        assert_eq!(config.bot_token, "test_token");
        assert!(config.telegram_api_url.is_none());
    }

    #[test]
    #[serial]
    fn test_validate_rejects_bad_input() {
        clear_env();
        let mut config = TelegramConfig::with_token("   ".to_string());
        assert!(config.validate().is_err());

        config.bot_token = "123:abc".into();
        config.telegram_api_url = Some("not a url".into());
        assert!(config.validate().is_err());
    }
}
