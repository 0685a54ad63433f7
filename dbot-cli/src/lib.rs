//! # dbot-cli
//!
//! CLI foundation: argument parsing, config loading, and the `run` / `history` / `users`
//! commands. The binary in `main.rs` only dispatches.

pub mod app;
pub mod cli;
pub mod config;

pub use app::{format_history, format_users, run_bot};
pub use cli::{Cli, Commands};
pub use config::AppConfig;
