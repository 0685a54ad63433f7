//! History-aware completion client for a single user.

use std::sync::Arc;

use openai_client::{ChatCompletionResponse, CompletionApiError};
use prompt::{Message, Role};
use storage::{ChatHistorial, HistorialStore, StorageError, UserRecord};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::LlmClient;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error(transparent)]
    Api(#[from] CompletionApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The API answered but persisting the exchange failed; the reply is kept so it can still
    /// be delivered.
    #[error("Reply received but not saved: {source}")]
    Unsaved {
        response: Box<ChatCompletionResponse>,
        #[source]
        source: StorageError,
    },
}

impl CompletionError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, CompletionError::Api(e) if e.is_authentication())
    }

    /// The reply that was received before a failed write, if any.
    pub fn unsaved_response(&self) -> Option<&ChatCompletionResponse> {
        match self {
            CompletionError::Unsaved { response, .. } => Some(response.as_ref()),
            _ => None,
        }
    }
}

/// Outcome of [`CompletionClient::resolve_api_call`].
#[derive(Debug, Clone)]
pub enum ResolvedCall {
    /// The conversation existed; the prompt went through the normal history flow.
    Continued(ChatCompletionResponse),
    /// No conversation existed; `content` became its system profile.
    Seeded {
        historial: ChatHistorial,
        response: ChatCompletionResponse,
    },
}

impl ResolvedCall {
    pub fn response(&self) -> &ChatCompletionResponse {
        match self {
            ResolvedCall::Continued(response) => response,
            ResolvedCall::Seeded { response, .. } => response,
        }
    }
}

/// Returns `prior` with `new_message` appended, as a new value; `prior` is left untouched.
/// Without a prior history, starts one with id `fresh_id` holding only `new_message`.
pub fn consolidate(
    prior: Option<&ChatHistorial>,
    new_message: Message,
    fresh_id: &str,
) -> ChatHistorial {
    let mut consolidated = match prior {
        Some(historial) => historial.clone(),
        None => ChatHistorial::new(fresh_id),
    };
    consolidated.messages.push(new_message);
    consolidated
}

/// Completion client bound to one user, one model, and the history store.
pub struct CompletionClient {
    api: Arc<dyn LlmClient>,
    user: UserRecord,
    model: String,
    historial: HistorialStore,
}

impl CompletionClient {
    /// Builds the client after a credential check against the API. A rejected token fails
    /// here, before anything is read or written.
    #[instrument(skip(api, user, model, historial), fields(user_id = user.id))]
    pub async fn connect(
        api: Arc<dyn LlmClient>,
        user: UserRecord,
        model: impl Into<String>,
        historial: HistorialStore,
    ) -> Result<Self, CompletionError> {
        let model = model.into();
        api.validate_credentials(&model, user.username.as_deref())
            .await
            .map_err(|e| {
                error!(error = %e, "Completion API rejected the token check");
                e
            })?;
        info!(model = %model, "Completion client created");
        Ok(Self::new(api, user, model, historial))
    }

    /// Builds the client without a credential check, for callers that already validated the
    /// token once (see [`connect`](Self::connect)).
    pub fn new(
        api: Arc<dyn LlmClient>,
        user: UserRecord,
        model: impl Into<String>,
        historial: HistorialStore,
    ) -> Self {
        Self {
            api,
            user,
            model: model.into(),
            historial,
        }
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `content` as a `role` message, optionally on top of the stored history, and
    /// optionally persists the prompt and reply.
    ///
    /// The API call happens before any write; a failed write after a successful call is
    /// returned as an error even though the reply exists.
    #[instrument(skip(self, content), fields(user_id = self.user.id))]
    pub async fn send_chat_completion(
        &self,
        chat_id: &str,
        content: &str,
        role: Role,
        save: bool,
        use_historial: bool,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let user_id = self.user.key();
        let prompt = Message::new(role, content, self.user.username.clone());

        let prior = if use_historial {
            self.historial.load(&user_id, chat_id)?
        } else {
            None
        };
        let consolidated = consolidate(prior.as_ref(), prompt.clone(), chat_id);

        let response = self
            .api
            .create_chat_completion(&self.model, &consolidated.messages)
            .await?;
        let reply = response
            .assistant_message()
            .ok_or(CompletionApiError::EmptyChoices)?;
        info!(
            chat_id = %chat_id,
            message_count = consolidated.messages.len(),
            reply_len = reply.content.len(),
            "Chat completion received"
        );

        if save {
            if let Err(source) = self.persist(&user_id, chat_id, prior.is_some(), prompt, reply) {
                error!(chat_id = %chat_id, error = %source, "Failed to persist chat exchange");
                return Err(CompletionError::Unsaved {
                    response: Box::new(response),
                    source,
                });
            }
        }
        Ok(response)
    }

    fn persist(
        &self,
        user_id: &str,
        chat_id: &str,
        had_historial: bool,
        prompt: Message,
        reply: Message,
    ) -> Result<(), StorageError> {
        if had_historial || self.historial.exists(user_id, chat_id) {
            self.historial.save(user_id, chat_id, prompt, reply)?;
        } else {
            warn!(chat_id = %chat_id, "No historial to append to, creating one");
            let fresh = ChatHistorial::new(chat_id).with_messages(vec![prompt, reply]);
            self.historial.create_with(user_id, &fresh)?;
        }
        Ok(())
    }

    /// Existing conversation: normal [`send_chat_completion`](Self::send_chat_completion).
    /// Otherwise `content` is a system profile: one call without history, then a new history
    /// seeded with the profile and its reply, under `chat_id` or a fresh UUID.
    #[instrument(skip(self, content), fields(user_id = self.user.id))]
    pub async fn resolve_api_call(
        &self,
        chat_id: Option<&str>,
        content: &str,
        role: Role,
        save: bool,
        use_historial: bool,
    ) -> Result<ResolvedCall, CompletionError> {
        let user_id = self.user.key();
        if let Some(chat_id) = chat_id {
            if self.historial.exists(&user_id, chat_id) {
                let response = self
                    .send_chat_completion(chat_id, content, role, save, use_historial)
                    .await?;
                return Ok(ResolvedCall::Continued(response));
            }
        }

        let seed_id = chat_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let response = self
            .send_chat_completion(&seed_id, content, Role::System, false, false)
            .await?;
        let reply = response
            .assistant_message()
            .ok_or(CompletionApiError::EmptyChoices)?;
        let historial = match self.historial.create_seeded(
            &user_id,
            &seed_id,
            Message::system(content),
            reply,
        ) {
            Ok(historial) => historial,
            Err(source) => {
                error!(chat_id = %seed_id, error = %source, "Failed to seed chat historial");
                return Err(CompletionError::Unsaved {
                    response: Box::new(response),
                    source,
                });
            }
        };
        Ok(ResolvedCall::Seeded {
            historial,
            response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consolidate_appends_without_touching_prior() {
        let prior = ChatHistorial::new("c").with_messages(vec![
            Message::system("p"),
            Message::user("q1"),
            Message::assistant("a1"),
        ]);
        let snapshot = prior.clone();

        let consolidated = consolidate(Some(&prior), Message::user("q2"), "unused");

        assert_eq!(prior, snapshot);
        assert_eq!(consolidated.id, "c");
        assert_eq!(consolidated.messages.len(), prior.messages.len() + 1);
        assert_eq!(&consolidated.messages[..3], &prior.messages[..]);
        assert_eq!(consolidated.messages[3], Message::user("q2"));
    }

    #[test]
    fn test_consolidate_without_prior_starts_fresh() {
        let consolidated = consolidate(None, Message::user("hi"), "fresh");
        assert_eq!(consolidated.id, "fresh");
        assert_eq!(consolidated.messages, vec![Message::user("hi")]);
        assert!(!consolidated.reacted_to_profiling_step);
    }

    #[test]
    fn test_consolidate_keeps_flags() {
        let mut prior = ChatHistorial::new("c");
        prior.reacted_to_profiling_step = true;
        prior.system_profile_set = true;
        let consolidated = consolidate(Some(&prior), Message::user("x"), "c");
        assert!(consolidated.reacted_to_profiling_step);
        assert!(consolidated.system_profile_set);
    }
}
