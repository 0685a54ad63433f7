//! Profiling opt-in state, derived from a stored history's flags.

use storage::ChatHistorial;

/// Where a (user, chat) conversation stands in the profiling flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// No history file yet.
    New,
    /// Prompt sent, no reaction recorded.
    AwaitingProfileReaction,
    /// User opted in and still has to send the profile text.
    ProfilingAccepted,
    /// User opted out; plain chat.
    ProfilingDeclined,
    /// Profile stored; chat with the persona.
    Ready,
}

impl ConversationState {
    pub fn of(historial: Option<&ChatHistorial>) -> Self {
        let Some(h) = historial else {
            return ConversationState::New;
        };
        match (
            h.reacted_to_profiling_step,
            h.is_reaction_positive,
            h.system_profile_set,
        ) {
            (_, _, true) => ConversationState::Ready,
            (false, _, false) => ConversationState::AwaitingProfileReaction,
            (true, true, false) => ConversationState::ProfilingAccepted,
            (true, false, false) => ConversationState::ProfilingDeclined,
        }
    }

    /// Chat commands go straight to the completion API.
    pub fn accepts_chat(&self) -> bool {
        matches!(
            self,
            ConversationState::ProfilingDeclined | ConversationState::Ready
        )
    }
}

/// A reaction that answers the profiling prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingReaction {
    Positive,
    Negative,
}

/// ✅ and ❌ are the canonical answers; 👍 and 👎 are accepted because Telegram's reaction palette
/// lacks the former.
const POSITIVE: &[&str] = &["✅", "👍"];
const NEGATIVE: &[&str] = &["❌", "👎"];

impl ProfilingReaction {
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        let emoji = emoji.trim_end_matches('\u{fe0f}');
        if POSITIVE.contains(&emoji) {
            Some(ProfilingReaction::Positive)
        } else if NEGATIVE.contains(&emoji) {
            Some(ProfilingReaction::Negative)
        } else {
            None
        }
    }

    /// First recognised emoji among the newly added ones.
    pub fn from_emojis<S: AsRef<str>>(emojis: &[S]) -> Option<Self> {
        emojis.iter().find_map(|e| Self::from_emoji(e.as_ref()))
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, ProfilingReaction::Positive)
    }
}
