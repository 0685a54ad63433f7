//! Dispatcher runner: commands and reactions from Telegram go to [`ChatRouter`].
//!
//! teloxide's default distribution key is the chat id, so updates from one chat are handled one
//! at a time while different chats run concurrently.

use anyhow::{Context, Result};
use dbot_core::{ToCoreMessage, ToCoreReaction};
use llm_handlers::ChatRouter;
use teloxide::{
    dispatching::{Dispatcher, HandlerExt, UpdateFilterExt},
    dptree,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    types::{AllowedUpdate, MessageReactionUpdated},
    update_listeners::Polling,
    utils::command::BotCommands,
};
use tracing::{error, info, instrument, warn};

use crate::adapters::{TelegramMessageWrapper, TelegramReactionWrapper};
use crate::commands::Command;
use crate::config::TelegramConfig;

/// teloxide Bot for `config`, pointed at the custom Bot API URL when one is set.
pub fn build_bot(config: &TelegramConfig) -> Result<teloxide::Bot> {
    config.validate()?;
    let bot = teloxide::Bot::new(&config.bot_token);
    match &config.telegram_api_url {
        Some(url) => {
            let url = reqwest::Url::parse(url).context("Invalid TELEGRAM_API_URL")?;
            info!(api_url = %url, "Using custom Telegram API URL");
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Registers the command list and long-polls until Ctrl-C. `message_reaction` updates are only
/// delivered when requested explicitly, so the allowed updates are set here.
#[instrument(skip(bot, router))]
pub async fn run_dispatcher(bot: teloxide::Bot, router: ChatRouter) -> Result<()> {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_message_reaction_updated().endpoint(reaction_handler));

    let listener = Polling::builder(bot.clone())
        .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::MessageReaction])
        .build();

    info!("Starting dispatcher");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|upd| async move {
            tracing::debug!(update_id = ?upd.id, "Unhandled update");
        })
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Error from the update listener"),
        )
        .await;

    warn!("Dispatcher stopped");
    Ok(())
}

async fn command_handler(msg: Message, cmd: Command, router: ChatRouter) -> ResponseResult<()> {
    let Some(core_msg) = TelegramMessageWrapper(&msg).to_core() else {
        info!(chat_id = msg.chat.id.0, "Ignoring command without an author");
        return Ok(());
    };
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        command = ?cmd,
        "Received command"
    );
    match router.handle_command(&core_msg, cmd.into()).await {
        Ok(outcome) => info!(?outcome, "Command handled"),
        Err(e) => error!(error = %e, user_id = core_msg.user.id, "Command handling failed"),
    }
    Ok(())
}

async fn reaction_handler(
    update: MessageReactionUpdated,
    router: ChatRouter,
) -> ResponseResult<()> {
    let Some(reaction) = TelegramReactionWrapper(&update).to_core() else {
        info!("Ignoring anonymous reaction");
        return Ok(());
    };
    info!(
        user_id = reaction.user.id,
        chat_id = reaction.chat.id,
        message_id = %reaction.message_id,
        emojis = ?reaction.emojis,
        "Received reaction"
    );
    match router.handle_reaction(&reaction).await {
        Ok(outcome) => info!(?outcome, "Reaction handled"),
        Err(e) => error!(error = %e, user_id = reaction.user.id, "Reaction handling failed"),
    }
    Ok(())
}
