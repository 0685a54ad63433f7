//! dbot CLI: run the Telegram bot, print stored histories and users. Config from env (`.env`
//! honoured) and optional CLI args.

use anyhow::Result;
use clap::Parser;
use dbot_cli::config::{data_dir_from_env, log_file_from_env};
use dbot_cli::{format_history, format_users, run_bot, AppConfig, Cli, Commands};
use dbot_core::init_tracing;
use storage::StorePaths;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            init_tracing(&log_file_from_env())?;
            let config = AppConfig::load(token)?;
            run_bot(config).await
        }
        Commands::History { user_id, chat_id } => {
            let paths = StorePaths::new(data_dir_from_env());
            print!("{}", format_history(&paths, &user_id, chat_id.as_deref())?);
            Ok(())
        }
        Commands::Users => {
            let paths = StorePaths::new(data_dir_from_env());
            print!("{}", format_users(&paths)?);
            Ok(())
        }
    }
}
