//! Chat history store: one JSON file per (user, chat) under `<base>/db/chats/<user_id>`.
//!
//! Every operation is a fresh read-modify-write against disk; nothing is cached between calls.

use std::path::PathBuf;

use prompt::Message;
use tracing::{error, info, instrument};

use crate::error::{Result, StorageError};
use crate::json_file::{self, WriteMode};
use crate::models::{ChatHistorial, HistorialUpdate};
use crate::paths::{list_json_stems, StorePaths};

#[derive(Debug, Clone)]
pub struct HistorialStore {
    paths: StorePaths,
}

impl HistorialStore {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    pub fn exists(&self, user_id: &str, chat_id: &str) -> bool {
        self.paths
            .chat_file(user_id, chat_id)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// Loads a history; `Ok(None)` when the conversation has no file yet.
    #[instrument(skip(self))]
    pub fn load(&self, user_id: &str, chat_id: &str) -> Result<Option<ChatHistorial>> {
        json_file::read(&self.paths.chat_file(user_id, chat_id)?)
    }

    /// Creates an empty history for `chat_id`, tied to the profiling prompt the user must react
    /// to. Returns the file path. Never overwrites an existing history.
    #[instrument(skip(self))]
    pub fn create(
        &self,
        user_id: &str,
        chat_id: &str,
        message_to_react_id: Option<String>,
    ) -> Result<PathBuf> {
        let mut historial = ChatHistorial::new(chat_id);
        historial.message_to_react_id = message_to_react_id;
        self.create_with(user_id, &historial)
    }

    /// Creates a history that already carries a system profile and its assistant reply.
    #[instrument(skip(self, system, reply))]
    pub fn create_seeded(
        &self,
        user_id: &str,
        chat_id: &str,
        system: Message,
        reply: Message,
    ) -> Result<ChatHistorial> {
        let historial = ChatHistorial::seeded_profile(chat_id, system, reply);
        self.create_with(user_id, &historial)?;
        Ok(historial)
    }

    /// Writes `historial` as a new file named after its id.
    pub fn create_with(&self, user_id: &str, historial: &ChatHistorial) -> Result<PathBuf> {
        let path = self.paths.chat_file(user_id, &historial.id)?;
        json_file::write(&path, historial, WriteMode::CreateNew)?;
        info!(
            path = %path.display(),
            message_count = historial.messages.len(),
            "Chat historial created"
        );
        Ok(path)
    }

    /// Loads the history, applies `update`, writes it back, and returns the new state.
    #[instrument(skip(self, update))]
    pub fn update(
        &self,
        user_id: &str,
        chat_id: &str,
        update: HistorialUpdate,
    ) -> Result<ChatHistorial> {
        let path = self.paths.chat_file(user_id, chat_id)?;
        let mut historial: ChatHistorial = json_file::read(&path)?.ok_or_else(|| {
            error!(path = %path.display(), "Cannot update missing chat historial");
            StorageError::NotFound(path.clone())
        })?;
        historial.apply(update);
        json_file::write(&path, &historial, WriteMode::Overwrite)?;
        info!(
            path = %path.display(),
            message_count = historial.messages.len(),
            "Chat historial updated"
        );
        Ok(historial)
    }

    /// Appends a prompt and its reply.
    pub fn save(
        &self,
        user_id: &str,
        chat_id: &str,
        prompt: Message,
        response: Message,
    ) -> Result<ChatHistorial> {
        self.update(user_id, chat_id, HistorialUpdate::exchange(prompt, response))
    }

    /// Conversation ids stored for a user, sorted.
    pub fn list_chats(&self, user_id: &str) -> Result<Vec<String>> {
        list_json_stems(&self.paths.chats_dir(user_id)?)
    }
}
