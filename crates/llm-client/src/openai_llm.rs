//! [`LlmClient`] backed by openai-client.

use async_trait::async_trait;
use openai_client::{ChatCompletionResponse, CompletionApiError, OpenAIClient};
use prompt::Message;
use tracing::instrument;

use super::config::LlmConfig;
use super::LlmClient;

/// OpenAI implementation of [`LlmClient`]. Holds the API token via the wrapped client.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: OpenAIClient,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
        }
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: OpenAIClient::with_base_url(api_key, base_url),
        }
    }

    /// Builds from config: custom base URL when set, default endpoint otherwise.
    pub fn from_config(config: &dyn LlmConfig) -> Self {
        match config.base_url() {
            Some(url) => Self::with_base_url(config.api_key().to_string(), url.to_string()),
            None => Self::new(config.api_key().to_string()),
        }
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self))]
    async fn validate_credentials(
        &self,
        model: &str,
        user_name: Option<&str>,
    ) -> Result<(), CompletionApiError> {
        self.client.check_token(model, user_name).await
    }

    #[instrument(skip(self, messages))]
    async fn create_chat_completion(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<ChatCompletionResponse, CompletionApiError> {
        self.client.create_chat_completion(model, messages, None).await
    }
}
