//! Conversation history model: the message list of one (user, chat) pair plus the profiling
//! opt-in flags.

use prompt::{Message, Role};
use serde::{Deserialize, Serialize};

/// Persisted conversation record.
///
/// `messages` only ever grows and the three flags only ever go from `false` to `true`;
/// [`ChatHistorial::apply`] is the single mutation path and enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistorial {
    pub id: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub reacted_to_profiling_step: bool,
    #[serde(default)]
    pub is_reaction_positive: bool,
    #[serde(default)]
    pub system_profile_set: bool,
    /// Platform id of the profiling prompt; reactions to any other message are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_to_react_id: Option<String>,
}

impl ChatHistorial {
    /// Empty history, no flags set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
            reacted_to_profiling_step: false,
            is_reaction_positive: false,
            system_profile_set: false,
            message_to_react_id: None,
        }
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// History that already went through an accepted profiling step: `[system, reply]`.
    pub fn seeded_profile(id: impl Into<String>, system: Message, reply: Message) -> Self {
        Self {
            reacted_to_profiling_step: true,
            is_reaction_positive: true,
            system_profile_set: true,
            ..Self::new(id).with_messages(vec![system, reply])
        }
    }

    /// First system-role message, i.e. the persona profile when one was set.
    pub fn system_profile(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.role == Role::System)
    }

    /// Applies an update in place: appends prompt then response, raises flags, records the
    /// prompt id. Flags already `true` stay `true`.
    pub fn apply(&mut self, update: HistorialUpdate) {
        if update.reacted_to_profiling_step {
            self.reacted_to_profiling_step = true;
        }
        if update.is_reaction_positive {
            self.is_reaction_positive = true;
        }
        if update.system_profile_set {
            self.system_profile_set = true;
        }
        if let Some(id) = update.message_to_react_id {
            self.message_to_react_id = Some(id);
        }
        if let Some(prompt) = update.prompt {
            self.messages.push(prompt);
        }
        if let Some(response) = update.response {
            self.messages.push(response);
        }
    }
}

/// Changes applied by `HistorialStore::update`. `false` flags mean "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorialUpdate {
    pub prompt: Option<Message>,
    pub response: Option<Message>,
    pub reacted_to_profiling_step: bool,
    pub is_reaction_positive: bool,
    pub system_profile_set: bool,
    pub message_to_react_id: Option<String>,
}

impl HistorialUpdate {
    /// Appends a prompt and the reply it produced.
    pub fn exchange(prompt: Message, response: Message) -> Self {
        Self {
            prompt: Some(prompt),
            response: Some(response),
            ..Self::default()
        }
    }

    /// Records the profiling reaction; `positive` also raises `is_reaction_positive`.
    pub fn reaction(positive: bool) -> Self {
        Self {
            reacted_to_profiling_step: true,
            is_reaction_positive: positive,
            ..Self::default()
        }
    }

    /// Appends the system profile message and raises `system_profile_set`.
    pub fn system_profile(system: Message) -> Self {
        Self {
            prompt: Some(system),
            system_profile_set: true,
            ..Self::default()
        }
    }

    pub fn with_message_to_react_id(mut self, id: impl Into<String>) -> Self {
        self.message_to_react_id = Some(id.into());
        self
    }
}
