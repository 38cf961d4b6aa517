//! OpenAI chat-completions client.

use async_trait::async_trait;
use learnarc_core::assistant::ports::{CompletionClient, CompletionReply, CompletionRequest};
use learnarc_domain::{LearnArcError, Result};
use reqwest::Method;
use tracing::{debug, info};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenAiError,
};
use crate::http::HttpClient;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_RATE_LIMIT_RETRY_SECS: u64 = 60;

/// Chat-completions client for the assistant features.
pub struct OpenAiCompletionClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAiCompletionClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `api_key` - provider API key
    /// * `api_url` - full chat-completions endpoint URL
    /// * `http_client` - HTTP client with retry support
    pub fn new(api_key: String, api_url: String, http_client: HttpClient) -> Self {
        Self { http_client, api_key, model: DEFAULT_MODEL.to_string(), api_url }
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn call_api(&self, request: &CompletionRequest) -> Result<CompletionReply> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: request.system.clone() },
                ChatMessage { role: "user".to_string(), content: request.user.clone() },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let request_builder = self
            .http_client
            .request(Method::POST, &self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload);

        let response = self.http_client.send(request_builder).await.map_err(|err| match err {
            LearnArcError::Network(message) => OpenAiError::Network(message).into(),
            other => other,
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "received completion response");

        if !status.is_success() {
            return Err(completion_error(status.as_u16(), response).await.into());
        }

        let chat_response: ChatCompletionResponse = response.json().await.map_err(|err| {
            LearnArcError::from(OpenAiError::InvalidPayload(format!(
                "failed to parse completion response: {err}"
            )))
        })?;

        let choice = chat_response.choices.into_iter().next().ok_or_else(|| {
            LearnArcError::from(OpenAiError::InvalidPayload(
                "response contained no choices".to_string(),
            ))
        })?;

        Ok(CompletionReply {
            content: choice.message.content,
            total_tokens: chat_response.usage.total_tokens,
        })
    }
}

async fn completion_error(status: u16, response: reqwest::Response) -> OpenAiError {
    let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
    match status {
        401 | 403 => OpenAiError::Authentication(format!("invalid API key ({status})")),
        429 => OpenAiError::RateLimit(DEFAULT_RATE_LIMIT_RETRY_SECS),
        _ => OpenAiError::Api { status, message },
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply> {
        let reply = self.call_api(&request).await?;
        info!(tokens = reply.total_tokens, "completion request finished");
        Ok(reply)
    }
}
