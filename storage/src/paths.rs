//! Per-entity path resolution under a base directory.

use std::path::{Path, PathBuf};

use crate::error::{Result, StorageError};

const DB_DIR: &str = "db";
const USERS_DIR: &str = "users";
const CHATS_DIR: &str = "chats";
const JSON_EXTENSION: &str = "json";

/// Resolves `<base>/db/users/<user_id>.json` and `<base>/db/chats/<user_id>/<chat_id>.json`.
#[derive(Debug, Clone)]
pub struct StorePaths {
    base: PathBuf,
}

impl StorePaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn users_dir(&self) -> PathBuf {
        self.base.join(DB_DIR).join(USERS_DIR)
    }

    pub fn user_file(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.users_dir().join(json_file_name(user_id)?))
    }

    pub fn chats_dir(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self
            .base
            .join(DB_DIR)
            .join(CHATS_DIR)
            .join(checked_key(user_id)?))
    }

    pub fn chat_file(&self, user_id: &str, chat_id: &str) -> Result<PathBuf> {
        Ok(self.chats_dir(user_id)?.join(json_file_name(chat_id)?))
    }
}

/// Lists the stems of `*.json` files directly inside `dir`, sorted. Missing dir → empty.
pub(crate) fn list_json_stems(dir: &Path) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::io(dir, e)),
    };
    let mut stems = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| StorageError::io(dir, e))?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(JSON_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    Ok(stems)
}

fn json_file_name(key: &str) -> Result<String> {
    Ok(format!("{}.{}", checked_key(key)?, JSON_EXTENSION))
}

fn checked_key(key: &str) -> Result<&str> {
    let invalid = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(key)
}
