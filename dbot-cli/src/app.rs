//! Command implementations behind the CLI.

use anyhow::{Context, Result};
use dbot_telegram::{build_bot, run_dispatcher, TelegramBotAdapter};
use llm_client::{LlmConfig, OpenAILlmClient};
use llm_handlers::{AppContext, ChatRouter};
use openai_client::mask_token;
use std::fmt::Write;
use std::sync::Arc;
use storage::{HistorialStore, StorePaths, UserStore};
use tracing::{info, instrument};

use crate::config::AppConfig;

/// Checks the OpenAI token once, builds the application context from `config`, and runs the
/// Telegram dispatcher until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_bot(config: AppConfig) -> Result<()> {
    info!(
        data_dir = %config.data_dir.display(),
        model = %config.llm.model(),
        api_key = %mask_token(config.llm.api_key()),
        "Initializing bot"
    );

    let llm = Arc::new(OpenAILlmClient::from_config(&config.llm));
    let ctx = AppContext::connect(StorePaths::new(&config.data_dir), llm, config.llm.model())
        .await
        .context("OpenAI token check failed")?;
    let bot = build_bot(&config.telegram)?;
    let router = ChatRouter::new(ctx, Arc::new(TelegramBotAdapter::new(bot.clone())));

    info!("Bot started successfully");
    run_dispatcher(bot, router).await
}

/// One line per message for a stored chat, or the user's chat ids when `chat_id` is `None`.
pub fn format_history(
    paths: &StorePaths,
    user_id: &str,
    chat_id: Option<&str>,
) -> Result<String> {
    let store = HistorialStore::new(paths.clone());
    let mut out = String::new();
    let Some(chat_id) = chat_id else {
        let chats = store
            .list_chats(user_id)
            .with_context(|| format!("List chats of user {}", user_id))?;
        if chats.is_empty() {
            writeln!(out, "No chats for user {}.", user_id)?;
        }
        for chat in chats {
            writeln!(out, "{}", chat)?;
        }
        return Ok(out);
    };

    let historial = store
        .load(user_id, chat_id)?
        .with_context(|| format!("No history for user {} in chat {}", user_id, chat_id))?;
    writeln!(
        out,
        "chat {} (reacted: {}, positive: {}, profile set: {})",
        historial.id,
        historial.reacted_to_profiling_step,
        historial.is_reaction_positive,
        historial.system_profile_set
    )?;
    for message in &historial.messages {
        writeln!(out, "{}", message)?;
    }
    Ok(out)
}

/// One line per registered user: id, name, and username when known.
pub fn format_users(paths: &StorePaths) -> Result<String> {
    let store = UserStore::new(paths.clone());
    let mut out = String::new();
    for id in store.list()? {
        match store.load(&id)? {
            Some(user) => writeln!(
                out,
                "{:<14} {:<24} {}",
                user.id,
                user.name,
                user.username.as_deref().unwrap_or("-")
            )?,
            None => continue,
        }
    }
    Ok(out)
}
