//! OpenAI chat-completions integration
//!
//! Implements the core `CompletionClient` port used by the assistant
//! service.

mod client;
mod types;

pub use client::OpenAiCompletionClient;
pub use types::OpenAiError;
