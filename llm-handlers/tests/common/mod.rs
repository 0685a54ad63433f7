//! Test doubles for the router: a recording [`dbot_core::Bot`] and a scripted
//! [`llm_client::LlmClient`].

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use dbot_core::{Bot, Chat, Message, Reaction, Result, User};
use llm_client::LlmClient;
use openai_client::{ChatCompletionResponse, Choice, CompletionApiError, ResponseMessage};
use prompt::{Message as PromptMessage, Role};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One outbound text, whichever Bot method sent it.
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub chat_id: i64,
    pub text: String,
}

/// Mock Bot that records every outbound text and hands out increasing message ids.
#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<SentRecord>>,
    next_id: AtomicUsize,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(100),
        })
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|r| r.text.clone())
    }

    fn record(&self, chat_id: i64, text: &str) {
        self.sent.lock().unwrap().push(SentRecord {
            chat_id,
            text: text.to_string(),
        });
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(chat.id, text);
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.record(message.chat.id, text);
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        self.record(chat.id, text);
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst).to_string())
    }
}

/// Mock LLM client: fixed reply, optional token or completion rejection, records every request.
pub struct MockLlmClient {
    reply: String,
    reject_token: bool,
    reject_completions: bool,
    /// Overwritten with invalid JSON while a completion is in flight.
    corrupt_on_completion: Option<PathBuf>,
    validations: AtomicUsize,
    requests: Mutex<Vec<Vec<PromptMessage>>>,
}

impl MockLlmClient {
    fn build(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            reject_token: false,
            reject_completions: false,
            corrupt_on_completion: None,
            validations: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self::build(reply))
    }

    pub fn rejecting_token() -> Arc<Self> {
        Arc::new(Self {
            reject_token: true,
            ..Self::build("")
        })
    }

    /// Accepts the token check but rejects completions as unauthenticated (revoked key).
    pub fn revoked() -> Arc<Self> {
        Arc::new(Self {
            reject_completions: true,
            ..Self::build("")
        })
    }

    /// Replies normally, but first breaks the file at `path` so the following store write fails.
    pub fn corrupting(path: PathBuf, reply: &str) -> Arc<Self> {
        Arc::new(Self {
            corrupt_on_completion: Some(path),
            ..Self::build(reply)
        })
    }

    pub fn requests(&self) -> Vec<Vec<PromptMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn completion_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn validations(&self) -> usize {
        self.validations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn validate_credentials(
        &self,
        _model: &str,
        _user_name: Option<&str>,
    ) -> std::result::Result<(), CompletionApiError> {
        self.validations.fetch_add(1, Ordering::SeqCst);
        if self.reject_token {
            return Err(CompletionApiError::Authentication(
                "Incorrect API key provided".into(),
            ));
        }
        Ok(())
    }

    async fn create_chat_completion(
        &self,
        model: &str,
        messages: &[PromptMessage],
    ) -> std::result::Result<ChatCompletionResponse, CompletionApiError> {
        if self.reject_completions {
            return Err(CompletionApiError::Authentication("key revoked".into()));
        }
        if let Some(path) = &self.corrupt_on_completion {
            std::fs::write(path, "{ not json").unwrap();
        }
        self.requests.lock().unwrap().push(messages.to_vec());
        Ok(ChatCompletionResponse {
            id: "chatcmpl-mock".into(),
            object: "chat.completion".into(),
            created: 0,
            model: model.into(),
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: Role::Assistant,
                    content: Some(self.reply.clone()),
                },
                finish_reason: Some("stop".into()),
            }],
            usage: None,
        })
    }
}

pub const USER_ID: i64 = 42;
pub const CHAT_ID: i64 = -1001;

pub fn author() -> User {
    User {
        id: USER_ID,
        username: Some("ada".into()),
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
    }
}

pub fn chat() -> Chat {
    Chat {
        id: CHAT_ID,
        chat_type: "group".into(),
    }
}

pub fn message(content: &str) -> Message {
    message_in(CHAT_ID, content)
}

pub fn message_in(chat_id: i64, content: &str) -> Message {
    Message {
        id: "1".into(),
        user: author(),
        chat: Chat {
            id: chat_id,
            chat_type: "group".into(),
        },
        content: content.into(),
        created_at: Utc::now(),
    }
}

/// `<base>/db/chats/<USER_ID>/<CHAT_ID>.json`.
pub fn chat_file(base: &Path) -> PathBuf {
    base.join("db")
        .join("chats")
        .join(USER_ID.to_string())
        .join(format!("{}.json", CHAT_ID))
}

pub fn reaction(message_id: &str, emoji: &str) -> Reaction {
    Reaction {
        user: author(),
        chat: chat(),
        message_id: message_id.into(),
        emojis: vec![emoji.into()],
    }
}
