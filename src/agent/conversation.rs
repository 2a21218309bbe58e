//! Conversation history for one agent turn

use serde::{Deserialize, Serialize};

use crate::agent::tool::{ToolCall, ToolResult};

/// A message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatMessage {
    /// Agent instructions, always first
    System(String),
    /// User input
    User(String),
    /// Model response, text and/or tool calls
    Assistant(AssistantContent),
    /// Result of a tool call
    Tool(ToolResult),
}

/// Content of a model response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantContent {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantContent {
    /// A plain text reply with no tool calls
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// History of a single agent turn.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with the given system instructions
    pub fn with_instructions(instructions: &str) -> Self {
        let mut conversation = Self::new();
        if !instructions.is_empty() {
            conversation
                .messages
                .push(ChatMessage::System(instructions.to_string()));
        }
        conversation
    }

    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::User(text.into()));
    }

    pub fn add_assistant_response(&mut self, content: AssistantContent) {
        self.messages.push(ChatMessage::Assistant(content));
    }

    pub fn add_tool_result(&mut self, result: ToolResult) {
        self.messages.push(ChatMessage::Tool(result));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
