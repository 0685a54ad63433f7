//! # LLM client
//!
//! Defines the [`LlmClient`] trait (the completion API boundary) with an OpenAI implementation,
//! and [`CompletionClient`], which binds one user to the history store: it validates the API
//! token on construction, consolidates stored history with each new prompt, submits it, and
//! persists the prompt and reply.

use async_trait::async_trait;
use openai_client::{ChatCompletionResponse, CompletionApiError};
use prompt::Message;

mod completion;
mod config;
mod openai_llm;

pub use completion::{consolidate, CompletionClient, CompletionError, ResolvedCall};
pub use config::{EnvLlmConfig, LlmConfig};
pub use openai_llm::OpenAILlmClient;

/// Completion API interface. Object safe so the router can hold `Arc<dyn LlmClient>`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Lightweight call that fails with [`CompletionApiError::Authentication`] when the token is
    /// rejected.
    async fn validate_credentials(
        &self,
        model: &str,
        user_name: Option<&str>,
    ) -> Result<(), CompletionApiError>;

    /// Submits the full ordered message list and returns the parsed reply.
    async fn create_chat_completion(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<ChatCompletionResponse, CompletionApiError>;
}
