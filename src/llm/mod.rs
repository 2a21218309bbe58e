//! Chat model clients
//!
//! The agent talks to a model through [`ChatClient`]; [`OpenAiChatClient`]
//! implements it for any OpenAI-compatible `/chat/completions` endpoint
//! (OpenRouter, OpenAI, local gateways).

pub mod openai;

pub use openai::OpenAiChatClient;

use async_trait::async_trait;

use crate::agent::conversation::{AssistantContent, ChatMessage};
use crate::agent::tool::ToolDefinition;
use crate::error::LlmError;

/// A chat model that supports function calling
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Provider name for logging (e.g. "openai")
    fn provider_name(&self) -> &str;

    /// Produce the next assistant message for a conversation
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<AssistantContent, LlmError>;
}
