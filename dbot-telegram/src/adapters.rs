//! Adapters from Telegram (teloxide) types to dbot_core types.

use dbot_core::{Chat, Message, Reaction, ToCoreMessage, ToCoreReaction, ToCoreUser, User};
use teloxide::types::{MessageReactionUpdated, ReactionType};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

fn core_chat(chat: &teloxide::types::Chat) -> Chat {
    Chat {
        id: chat.id.0,
        chat_type: if chat.is_private() {
            "private".to_string()
        } else {
            "group".to_string()
        },
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Option<Message> {
        let author = self.0.from.as_ref()?;
        Some(Message {
            id: self.0.id.to_string(),
            user: TelegramUserWrapper(author).to_core(),
            chat: core_chat(&self.0.chat),
            content: self.0.text().unwrap_or("").to_string(),
            created_at: self.0.date,
        })
    }
}

/// Wraps a `message_reaction` update for conversion to core [`Reaction`].
pub struct TelegramReactionWrapper<'a>(pub &'a MessageReactionUpdated);

impl<'a> ToCoreReaction for TelegramReactionWrapper<'a> {
    fn to_core(&self) -> Option<Reaction> {
        let user = self.0.user()?;
        Some(Reaction {
            user: TelegramUserWrapper(user).to_core(),
            chat: core_chat(&self.0.chat),
            message_id: self.0.message_id.to_string(),
            emojis: added_emojis(&self.0.old_reaction, &self.0.new_reaction),
        })
    }
}

/// Plain emoji present in `new` but not in `old`.
pub(crate) fn added_emojis(old: &[ReactionType], new: &[ReactionType]) -> Vec<String> {
    new.iter()
        .filter(|r| !old.contains(r))
        .filter_map(|r| match r {
            ReactionType::Emoji { emoji } => Some(emoji.clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emoji(e: &str) -> ReactionType {
        ReactionType::Emoji {
            emoji: e.to_string(),
        }
    }

    /// **Test: TelegramUserWrapper converts teloxide User to core User with correct id, username, first_name, last_name.**
    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
        assert_eq!(core_user.display_name(), "Test User");
    }

    fn parse_message(json: &str) -> teloxide::types::Message {
        serde_json::from_str(json).expect("valid Telegram message JSON")
    }

    /// **Test: A user's message converts with author, chat and text.**
    #[test]
    fn test_telegram_message_wrapper_to_core() {
        let msg = parse_message(
            r#"{
                "message_id": 5,
                "date": 1700000000,
                "chat": {"id": 42, "type": "private", "first_name": "Ada"},
                "from": {"id": 42, "is_bot": false, "first_name": "Ada", "username": "ada"},
                "text": "/chat hi"
            }"#,
        );

        let core = TelegramMessageWrapper(&msg).to_core().unwrap();

        assert_eq!(core.id, "5");
        assert_eq!(core.user.id, 42);
        assert_eq!(core.user.username.as_deref(), Some("ada"));
        assert_eq!(core.chat.id, 42);
        assert_eq!(core.chat.chat_type, "private");
        assert_eq!(core.content, "/chat hi");
    }

    /// **Test: A channel post has no author and is not converted.**
    #[test]
    fn test_channel_post_without_author_is_skipped() {
        let msg = parse_message(
            r#"{
                "message_id": 9,
                "date": 1700000000,
                "chat": {"id": -1001, "type": "channel", "title": "news"},
                "text": "/chat hi"
            }"#,
        );

        assert!(TelegramMessageWrapper(&msg).to_core().is_none());
    }

    /// **Test: Only emoji newly added by the update are reported.**
    #[test]
    fn test_added_emojis_skips_existing() {
        let old = vec![emoji("👍")];
        let new = vec![emoji("👍"), emoji("❤")];
        assert_eq!(added_emojis(&old, &new), vec!["❤".to_string()]);
    }

    /// **Test: Removing a reaction reports nothing.**
    #[test]
    fn test_added_emojis_on_removal() {
        let old = vec![emoji("👎")];
        assert!(added_emojis(&old, &[]).is_empty());
    }
}
