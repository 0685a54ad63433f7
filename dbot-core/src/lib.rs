//! # dbot-core
//!
//! Core types and traits shared by the platform adapter and the router: [`Bot`], platform user,
//! chat, inbound message and reaction types, and tracing initialization. Transport-agnostic;
//! used by dbot-telegram and llm-handlers.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{DbotError, Result};
pub use logger::init_tracing;
pub use types::{Chat, Message, Reaction, ToCoreMessage, ToCoreReaction, ToCoreUser, User};
