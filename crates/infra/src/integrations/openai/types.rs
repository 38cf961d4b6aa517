//! OpenAI API payload types and error taxonomy.

use learnarc_domain::LearnArcError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/* -------------------------------------------------------------------------- */
/* Request payloads */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

/* -------------------------------------------------------------------------- */
/* Response payloads */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Usage {
    #[serde(default)]
    pub total_tokens: u32,
}

/* -------------------------------------------------------------------------- */
/* Errors */
/* -------------------------------------------------------------------------- */

/// Errors from the completion provider.
#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limited, retry after {0}s")]
    RateLimit(u64),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response payload: {0}")]
    InvalidPayload(String),
}

impl From<OpenAiError> for LearnArcError {
    fn from(value: OpenAiError) -> Self {
        match value {
            OpenAiError::Authentication(message) => LearnArcError::Auth(message),
            OpenAiError::RateLimit(retry_after) => LearnArcError::RateLimited(retry_after),
            OpenAiError::Api { status, message } => {
                LearnArcError::Provider(format!("completion API error {status}: {message}"))
            }
            OpenAiError::Network(message) => LearnArcError::Network(message),
            OpenAiError::InvalidPayload(message) => LearnArcError::Provider(message),
        }
    }
}
