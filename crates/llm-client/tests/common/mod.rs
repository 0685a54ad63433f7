//! Mock [`llm_client::LlmClient`] for integration tests.
//!
//! Records every completion request so tests can assert on what was sent, and can be told to
//! reject the token check or the completion calls.

use async_trait::async_trait;
use llm_client::LlmClient;
use openai_client::{ChatCompletionResponse, Choice, CompletionApiError, ResponseMessage, Usage};
use prompt::{Message, Role};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct MockLlmClient {
    reply: String,
    reject_token: bool,
    reject_completions: bool,
    validations: AtomicUsize,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockLlmClient {
    fn build(reply: &str, reject_token: bool, reject_completions: bool) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            reject_token,
            reject_completions,
            validations: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Accepts the token and answers every completion with `reply`.
    pub fn replying(reply: &str) -> Arc<Self> {
        Self::build(reply, false, false)
    }

    /// Rejects the token check.
    pub fn rejecting_token() -> Arc<Self> {
        Self::build("", true, false)
    }

    /// Accepts the token check but rejects completions as unauthenticated (revoked key).
    pub fn revoked_after_check() -> Arc<Self> {
        Self::build("", false, true)
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
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
    ) -> Result<(), CompletionApiError> {
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
        messages: &[Message],
    ) -> Result<ChatCompletionResponse, CompletionApiError> {
        if self.reject_completions {
            return Err(CompletionApiError::Authentication("key revoked".into()));
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
            usage: Some(Usage {
                prompt_tokens: 1,
                completion_tokens: 1,
                total_tokens: 2,
            }),
        })
    }
}
