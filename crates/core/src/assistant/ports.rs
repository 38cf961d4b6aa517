//! Port interface for the text-generation provider

use async_trait::async_trait;
use learnarc_domain::Result;

/// One chat-completion request: a system preamble plus the user text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Provider reply with token accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReply {
    pub content: String,
    pub total_tokens: u32,
}

/// Trait for a chat-completions provider
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Execute one completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply>;
}
