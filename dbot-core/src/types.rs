//! Core types: platform user, chat, inbound message and reaction, plus conversion traits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform user identity (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl User {
    /// First and last name joined with a space; falls back to the username, then the id.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if !parts.is_empty() {
            return parts.join(" ");
        }
        self.username
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// Chat (group or private) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// An inbound text message; for commands `content` holds the argument text only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A reaction added by `user` to message `message_id` in `chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub user: User,
    pub chat: Chat,
    pub message_id: String,
    /// Newly added emoji; custom emoji and paid reactions are not represented.
    pub emojis: Vec<String>,
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`]; `None` when the message has
/// no author (channel posts).
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Option<Message>;
}

/// Converts a transport-specific reaction update to core [`Reaction`]; `None` when the update
/// carries no user (anonymous admin or channel reactions).
pub trait ToCoreReaction: Send + Sync {
    fn to_core(&self) -> Option<Reaction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>, username: Option<&str>) -> User {
        User {
            id: 42,
            username: username.map(str::to_string),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn test_display_name_joins_names() {
        assert_eq!(user(Some("Ada"), Some("Lovelace"), None).display_name(), "Ada Lovelace");
        assert_eq!(user(Some("Ada"), None, Some("ada")).display_name(), "Ada");
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(user(None, None, Some("ada")).display_name(), "ada");
        assert_eq!(user(Some("  "), None, None).display_name(), "42");
    }
}
