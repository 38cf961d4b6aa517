//! AI assistant: prompt templates over a text-generation provider

pub mod ports;
mod service;

pub use service::{AssistantContext, AssistantReply, AssistantService, ReplyKind, SkillLevel};
