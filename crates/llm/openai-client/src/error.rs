//! Errors returned by the completion API wrapper.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionApiError {
    /// Credentials were rejected. Never retried.
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Reply could not be parsed into a `ChatCompletionResponse`.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("No choices in completion response")]
    EmptyChoices,
}

impl CompletionApiError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, CompletionApiError::Authentication(_))
    }
}

/// True when an API error payload describes rejected credentials.
pub fn is_authentication_failure(code: Option<&str>, kind: Option<&str>, message: &str) -> bool {
    code.is_some_and(|c| c.contains("invalid_api_key"))
        || kind.is_some_and(|k| k.contains("authentication"))
        || message.contains("Incorrect API key")
        || message.contains("invalid_api_key")
}

impl From<async_openai::error::OpenAIError> for CompletionApiError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        use async_openai::error::OpenAIError;
        match err {
            OpenAIError::ApiError(api) => {
                let code = api.code.as_ref().map(|c| c.to_string());
                let kind = api.r#type.as_ref().map(|t| t.to_string());
                if is_authentication_failure(code.as_deref(), kind.as_deref(), &api.message) {
                    CompletionApiError::Authentication(api.message)
                } else {
                    CompletionApiError::Api(api.message)
                }
            }
            OpenAIError::InvalidArgument(msg) => CompletionApiError::InvalidRequest(msg),
            OpenAIError::JSONDeserialize(e) => CompletionApiError::InvalidResponse(e.to_string()),
            other => CompletionApiError::Api(other.to_string()),
        }
    }
}
