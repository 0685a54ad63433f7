//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dbot")]
#[command(about = "Persona chat bot: run the Telegram bot, inspect stored users and chats", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Print a stored chat history, or list the user's chats when no chat id is given.
    History {
        user_id: String,
        chat_id: Option<String>,
    },
    /// List registered users.
    Users,
}
