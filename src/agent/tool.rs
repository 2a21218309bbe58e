//! Tool abstraction
//!
//! A tool is a named, schema-described async function the agent may call
//! in the middle of a turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;

/// Describes a tool's interface for the chat model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name (e.g. `get_meal_by_name`)
    pub name: String,

    /// Human-readable description for the model
    pub description: String,

    /// JSON Schema describing the expected arguments
    pub input_schema: Value,
}

/// A call to a tool requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier used to match the result to the call
    pub id: String,

    pub name: String,

    pub arguments: Value,
}

/// Outcome of a tool call, sent back to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Must match [`ToolCall::id`]
    pub tool_call_id: String,

    pub content: String,

    pub is_error: bool,
}

impl ToolResult {
    /// Fold an invocation outcome into a result for the model
    pub fn from_outcome(tool_call_id: impl Into<String>, outcome: Result<String, ToolError>) -> Self {
        match outcome {
            Ok(content) => Self {
                tool_call_id: tool_call_id.into(),
                content,
                is_error: false,
            },
            Err(e) => Self {
                tool_call_id: tool_call_id.into(),
                content: format!("Error: {}", e),
                is_error: true,
            },
        }
    }
}

/// Implemented by every callable tool.
///
/// Tools return text. Domain failures belong in that text; `Err` is for
/// calls that could not be made at all, such as malformed arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn invoke(&self, arguments: Value) -> Result<String, ToolError>;
}

/// Derive a tool's argument schema from a `schemars` type.
///
/// The `$schema` and `title` keys are dropped; chat endpoints only want the
/// object schema itself.
pub fn schema_for<T: schemars::JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    #[derive(schemars::JsonSchema)]
    struct Args {
        /// Dish to look up
        dish: String,
        servings: Option<u32>,
    }

    #[test]
    fn test_schema_for() {
        let schema = schema_for::<Args>();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], serde_json::json!(["dish"]));
        assert_eq!(schema["properties"]["dish"]["description"], "Dish to look up");
        assert!(schema.get("$schema").is_none());
        assert!(schema.get("title").is_none());
    }

    #[test]
    fn test_result_from_outcome() {
        let ok = ToolResult::from_outcome("call_1", Ok("done".to_string()));
        assert!(!ok.is_error);
        assert_eq!(ok.content, "done");

        let err = ToolResult::from_outcome(
            "call_2",
            Err(ToolError::UnknownTool {
                name: "nope".to_string(),
            }),
        );
        assert!(err.is_error);
        assert_eq!(err.content, "Error: Unknown tool: nope");
    }
}
