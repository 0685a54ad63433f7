//! Storage crate: JSON file persistence for users and conversation histories.
//!
//! ## Layout
//!
//! ```text
//! <base>/db/users/<user_id>.json
//! <base>/db/chats/<user_id>/<chat_id>.json
//! ```
//!
//! Files are UTF-8 JSON with 4-space indentation. Every write goes to a temp file in the target
//! directory and is renamed into place, so a file is either fully written or untouched.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserRecord, ChatHistorial, HistorialUpdate
//! - [`paths`] – StorePaths (per-entity path resolution)
//! - [`json_file`] – raw JSON read / atomic write
//! - [`user_store`] – UserStore
//! - [`historial_store`] – HistorialStore

mod error;
pub mod json_file;
mod models;
mod paths;
mod historial_store;
mod user_store;

pub use error::{Result, StorageError};
pub use historial_store::HistorialStore;
pub use models::{ChatHistorial, HistorialUpdate, UserRecord};
pub use paths::StorePaths;
pub use user_store::UserStore;
