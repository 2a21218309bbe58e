//! MCP tool definitions and handlers
//!
//! The server exposes a single tool: the agent itself. A call runs one agent
//! turn with the given task and returns the agent's final answer.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::agent::ChatAgent;
use crate::error::McpError;
use crate::mcp::types::{CallToolResult, Tool};

/// Tool handler
pub struct ToolHandler {
    agent: Arc<ChatAgent>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(agent: Arc<ChatAgent>) -> Self {
        Self { agent }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![Tool {
            name: self.agent.name().to_string(),
            description: Some(self.agent.description().to_string()).filter(|d| !d.is_empty()),
            input_schema: agent_schema(),
        }]
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        if name != self.agent.name() {
            let err = McpError::UnknownTool {
                name: name.to_string(),
            };
            return CallToolResult::error(err.to_string());
        }

        self.handle_run_agent(args).await
    }

    // ==================== Tool Handlers ====================

    async fn handle_run_agent(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            task: String,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => {
                let err = McpError::InvalidArguments {
                    message: e.to_string(),
                };
                return CallToolResult::error(err.to_string());
            }
        };

        tracing::info!(agent = self.agent.name(), "Running agent task");

        match self.agent.run(&args.task).await {
            Ok(answer) => CallToolResult::text(answer),
            Err(e) => {
                tracing::error!(agent = self.agent.name(), "Agent run failed: {}", e);
                CallToolResult::error(e.to_string())
            }
        }
    }
}

// ==================== Tool Schemas ====================

fn agent_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "task": {
                "type": "string",
                "description": "Task for the agent, e.g. 'How do I make Arrabiata?' or 'Surprise me with a dinner idea'"
            }
        },
        "required": ["task"]
    })
}
