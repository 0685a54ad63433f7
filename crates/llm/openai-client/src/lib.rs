//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for non-streaming chat completion. Converts
//! [`prompt::Message`] lists into request messages, parses replies into
//! [`ChatCompletionResponse`], and classifies rejected credentials as
//! [`CompletionApiError::Authentication`]. Provides token masking for safe logging.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use prompt::{Message, Role};
use std::sync::Arc;
use tracing::{error, info, instrument};

mod error;
mod response;

pub use error::{is_authentication_failure, CompletionApiError};
pub use response::{ChatCompletionResponse, Choice, ResponseMessage, Usage};

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Prompt of the credential check sent once when a completion client is built.
pub const TOKEN_CHECK_PROMPT: &str = "Just trying the token validity via an api call";

/// Reply budget of the credential check.
pub const TOKEN_CHECK_MAX_TOKENS: u32 = 5;

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// Converts one history message into an OpenAI request message, keeping `name` when set.
pub fn to_request_message(
    msg: &Message,
) -> Result<ChatCompletionRequestMessage, CompletionApiError> {
    let content = msg.content.clone();
    let request: ChatCompletionRequestMessage = match msg.role {
        Role::System => {
            let mut args = ChatCompletionRequestSystemMessageArgs::default();
            args.content(content);
            if let Some(name) = &msg.name {
                args.name(name.clone());
            }
            args.build()?.into()
        }
        Role::User => {
            let mut args = ChatCompletionRequestUserMessageArgs::default();
            args.content(content);
            if let Some(name) = &msg.name {
                args.name(name.clone());
            }
            args.build()?.into()
        }
        Role::Assistant => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            args.content(content);
            if let Some(name) = &msg.name {
                args.name(name.clone());
            }
            args.build()?.into()
        }
    };
    Ok(request)
}

/// OpenAI chat client. Wraps the async-openai client; holds the API key only for masked logging.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    api_key_for_logging: Option<String>,
}

impl OpenAIClient {
    /// Builds a client using the given API key and default API base URL.
    pub fn new(api_key: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging,
        }
    }

    /// Builds a client with a custom base URL (proxies, compatible endpoints, test servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging,
        }
    }

    fn masked_key(&self) -> String {
        self.api_key_for_logging
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "***".to_string())
    }

    /// Sends the full message list and returns the parsed reply.
    ///
    /// Logs the masked API key and token usage. A reply without choices is
    /// [`CompletionApiError::EmptyChoices`].
    #[allow(deprecated)]
    #[instrument(skip(self, messages), fields(message_count = messages.len()))]
    pub async fn create_chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        max_tokens: Option<u32>,
    ) -> Result<ChatCompletionResponse, CompletionApiError> {
        info!(
            model = %model,
            api_key = %self.masked_key(),
            "OpenAI chat completion request"
        );

        let request_messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model).messages(request_messages);
        if let Some(max_tokens) = max_tokens {
            args.max_tokens(max_tokens);
        }
        let request = args.build()?;

        let raw = self.client.chat().create(request).await.map_err(|e| {
            let err = CompletionApiError::from(e);
            error!(error = %err, "OpenAI chat completion failed");
            err
        })?;

        let value = serde_json::to_value(&raw)
            .map_err(|e| CompletionApiError::InvalidResponse(e.to_string()))?;
        let response: ChatCompletionResponse = serde_json::from_value(value)
            .map_err(|e| CompletionApiError::InvalidResponse(e.to_string()))?;

        if let Some(usage) = response.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "OpenAI chat completion usage"
            );
        }
        if response.choices.is_empty() {
            return Err(CompletionApiError::EmptyChoices);
        }
        Ok(response)
    }

    /// Cheap call proving the key is accepted: one short user message, tiny reply budget.
    #[instrument(skip(self))]
    pub async fn check_token(
        &self,
        model: &str,
        user_name: Option<&str>,
    ) -> Result<(), CompletionApiError> {
        let mut probe = Message::user(TOKEN_CHECK_PROMPT);
        probe.name = user_name.map(str::to_string);
        self.create_chat_completion(model, &[probe], Some(TOKEN_CHECK_MAX_TOKENS))
            .await?;
        info!(api_key = %self.masked_key(), "OpenAI token accepted");
        Ok(())
    }
}
