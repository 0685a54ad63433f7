//! User record model: one file per platform user, written once on first interaction.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub name: String,
    /// Not every platform exposes one (Telegram does not).
    #[serde(default)]
    pub email: Option<String>,
}

impl UserRecord {
    pub fn new(id: i64, username: Option<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            username,
            name: name.into(),
            email: None,
        }
    }

    /// File key for this record.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}
