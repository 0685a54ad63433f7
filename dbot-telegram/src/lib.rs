//! # dbot-telegram
//!
//! Telegram layer: adapters to [`dbot_core`] types, the [`dbot_core::Bot`] implementation, the
//! bot's command set, config, and the dispatcher that feeds commands and reactions to
//! [`llm_handlers::ChatRouter`]. No persistence or completion logic lives here.

mod adapters;
mod bot_adapter;
mod commands;
mod config;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramReactionWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use commands::Command;
pub use config::TelegramConfig;
pub use runner::{build_bot, run_dispatcher};
