//! MCP Server implementation
//!
//! Implements the Model Context Protocol server for stdio transport.
//! Messages are newline-delimited JSON-RPC; stdout carries nothing else.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::Result;
use crate::mcp::tools::ToolHandler;
use crate::mcp::types::*;

/// MCP Server info
const SERVER_NAME: &str = "food-recipes";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server exposing the FoodAgent
pub struct McpServer {
    /// Tool handler
    tool_handler: ToolHandler,

    /// Whether the client finished initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(tool_handler: ToolHandler) -> Self {
        Self {
            tool_handler,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the server on stdio until EOF or Ctrl-C
    pub async fn run_stdio(&mut self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();

        tokio::select! {
            result = self.run(reader, writer) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                Ok(())
            }
        }
    }

    /// Serve messages from `reader`, writing responses to `writer`, until EOF
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let mut response_str = serde_json::to_string(&response)?;
                response_str.push('\n');
                writer.write_all(response_str.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle an incoming JSON-RPC message
    async fn handle_message(&mut self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(v) => v,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(e.to_string()),
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(req) => req,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::invalid_request(e.to_string()),
                ));
            }
        };

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(&request),
            methods::PING => Ok(serde_json::json!({})),
            methods::LIST_TOOLS => self.handle_list_tools(),
            methods::CALL_TOOL => Ok(self.handle_call_tool(&request).await),
            _ => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::method_not_found(&request.method),
                ))
            }
        };

        Some(match response {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
        })
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            methods::INITIALIZED => {
                self.initialized = true;
                tracing::info!("Client initialized");
            }
            other => tracing::debug!(method = other, "Ignoring notification"),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, request: &JsonRpcRequest) -> Result<Value> {
        if let Some(params) = request
            .params
            .as_ref()
            .and_then(|p| serde_json::from_value::<InitializeParams>(p.clone()).ok())
        {
            let client = params.client_info.map(|c| c.name).unwrap_or_default();
            tracing::info!(client = %client, protocol = %params.protocol_version, "Initialize");
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {}),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle list tools request
    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.tool_handler.list_tools(),
        };

        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request. Failures become `isError` results.
    async fn handle_call_tool(&self, request: &JsonRpcRequest) -> Value {
        let result = match request.params.as_ref() {
            Some(p) => match serde_json::from_value::<CallToolParams>(p.clone()) {
                Ok(params) => {
                    self.tool_handler
                        .call_tool(&params.name, params.arguments)
                        .await
                }
                Err(e) => CallToolResult::error(format!("Invalid tool parameters: {}", e)),
            },
            None => CallToolResult::error("Missing tool parameters"),
        };

        serde_json::to_value(result).unwrap_or_else(|e| {
            serde_json::json!({
                "content": [{"type": "text", "text": format!("Error: {}", e)}],
                "isError": true
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::conversation::AssistantContent;
    use crate::config::{AgentConfig, MealDbConfig};
    use crate::food::build_food_agent;
    use crate::llm::mock::ScriptedChatClient;
    use crate::mealdb::MealDbClient;
    use serde_json::json;
    use std::sync::Arc;

    fn server(client: Arc<ScriptedChatClient>) -> McpServer {
        let meal_db = Arc::new(MealDbClient::new(&MealDbConfig::default()).unwrap());
        let agent = build_food_agent(client, meal_db, &AgentConfig::default()).unwrap();
        McpServer::new(ToolHandler::new(Arc::new(agent)))
    }

    async fn exchange(server: &mut McpServer, input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        server.run(input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_server_info() {
        assert_eq!(SERVER_NAME, "food-recipes");
    }

    #[tokio::test]
    async fn test_handshake_and_list() {
        let mut server = server(Arc::new(ScriptedChatClient::new()));
        let input = [
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test","version":"1.0"},"capabilities":{}}}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            r#"{"jsonrpc":"2.0","id":"p","method":"ping"}"#,
        ]
        .join("\n");

        let responses = exchange(&mut server, &input).await;
        assert!(server.is_initialized());
        assert_eq!(responses.len(), 3);

        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["protocolVersion"], MCP_VERSION);
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "food-recipes");
        assert!(responses[0]["result"]["capabilities"]["tools"].is_object());

        assert_eq!(responses[1]["result"]["tools"][0]["name"], "FoodAgent");
        assert_eq!(responses[2]["id"], "p");
        assert_eq!(responses[2]["result"], json!({}));
    }

    #[tokio::test]
    async fn test_call_tool() {
        let client = Arc::new(ScriptedChatClient::new());
        client.queue(AssistantContent::text("Try shakshuka."));
        let mut server = server(client);

        let input = r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"FoodAgent","arguments":{"task":"Brunch?"}}}"#;
        let responses = exchange(&mut server, input).await;

        assert_eq!(responses[0]["id"], 7);
        assert_eq!(responses[0]["result"]["content"][0]["text"], "Try shakshuka.");
        assert!(responses[0]["result"].get("isError").is_none());
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let mut server = server(Arc::new(ScriptedChatClient::new()));
        let input = [
            "{not json",
            r#"{"jsonrpc":"2.0","id":3}"#,
            r#"{"jsonrpc":"2.0","id":4,"method":"resources/list"}"#,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call"}"#,
        ]
        .join("\n");

        let responses = exchange(&mut server, &input).await;
        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert!(responses[0]["id"].is_null());
        assert_eq!(responses[1]["error"]["code"], -32600);
        assert_eq!(responses[2]["error"]["code"], -32601);
        assert_eq!(responses[2]["id"], 4);
        assert_eq!(responses[3]["result"]["isError"], true);
    }
}
