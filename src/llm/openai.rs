//! OpenAI-compatible chat completions client with function calling

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::agent::conversation::{AssistantContent, ChatMessage};
use crate::agent::tool::{ToolCall, ToolDefinition};
use crate::config::LlmConfig;
use crate::error::{LlmError, Result};
use crate::llm::ChatClient;

pub struct OpenAiChatClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiChatClient {
    /// Create a client from configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body(&self, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages.iter().map(message_to_openai).collect::<Vec<_>>(),
        });

        if !tools.is_empty() {
            body["tools"] = Value::Array(tools.iter().map(tool_to_openai).collect());
        }
        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> std::result::Result<AssistantContent, LlmError> {
        let url = self.completions_url();
        tracing::debug!(url = %url, model = %self.model, messages = messages.len(), "Chat completion request");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages, tools))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Auth {
                    status: status.as_u16(),
                },
                429 => LlmError::RateLimited,
                code => LlmError::Api {
                    status: code,
                    message: text,
                },
            });
        }

        let body: CompletionResponse = response.json().await?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response has no choices".to_string()))?;

        Ok(choice.message.into_content())
    }
}

// ==================== Wire Format ====================

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,

    #[serde(default)]
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
struct ResponseFunction {
    name: String,

    /// JSON-encoded arguments
    #[serde(default)]
    arguments: String,
}

impl ResponseMessage {
    fn into_content(self) -> AssistantContent {
        let tool_calls = self
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: decode_arguments(&call.function.arguments),
            })
            .collect();

        AssistantContent {
            text: self.content.filter(|t| !t.is_empty()),
            tool_calls,
        }
    }
}

/// Decode a tool call's argument string.
///
/// Blank means no arguments. Undecodable text is kept as a JSON string so the
/// tool reports it as invalid input.
fn decode_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return json!({});
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn tool_to_openai(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.input_schema,
        }
    })
}

fn message_to_openai(message: &ChatMessage) -> Value {
    match message {
        ChatMessage::System(text) => json!({"role": "system", "content": text}),
        ChatMessage::User(text) => json!({"role": "user", "content": text}),
        ChatMessage::Assistant(content) => {
            let mut value = json!({
                "role": "assistant",
                "content": content.text,
            });
            if content.has_tool_calls() {
                value["tool_calls"] = content
                    .tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments.to_string(),
                            }
                        })
                    })
                    .collect();
            }
            value
        }
        ChatMessage::Tool(result) => json!({
            "role": "tool",
            "tool_call_id": result.tool_call_id,
            "content": result.content,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tool::ToolResult;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn client_for(server: &Server) -> OpenAiChatClient {
        OpenAiChatClient::new(&LlmConfig {
            endpoint: format!("{}/api/v1/", server.url()),
            api_key: "fake_api_key".to_string(),
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
            temperature: None,
            max_tokens: None,
        })
        .unwrap()
    }

    fn random_meal_tool() -> ToolDefinition {
        ToolDefinition {
            name: "get_random_meal".to_string(),
            description: "random".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        }
    }

    #[tokio::test]
    async fn test_parses_tool_calls() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .match_body(Matcher::PartialJson(json!({"model": "test-model"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{
                        "message": {
                            "role": "assistant",
                            "content": null,
                            "tool_calls": [{
                                "id": "call_abc",
                                "type": "function",
                                "function": {"name": "get_meal_by_name", "arguments": "{\"meal_name\":\"Arrabiata\"}"}
                            }]
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let content = client_for(&server)
            .complete(&[ChatMessage::User("Arrabiata please".to_string())], &[random_meal_tool()])
            .await
            .unwrap();

        assert!(content.text.is_none());
        assert_eq!(content.tool_calls.len(), 1);
        assert_eq!(content.tool_calls[0].id, "call_abc");
        assert_eq!(content.tool_calls[0].arguments, json!({"meal_name": "Arrabiata"}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_parses_text() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Enjoy your penne!"}}]}"#)
            .create_async()
            .await;

        let content = client_for(&server)
            .complete(&[ChatMessage::User("hi".to_string())], &[])
            .await
            .unwrap();

        assert_eq!(content.text.as_deref(), Some("Enjoy your penne!"));
        assert!(!content.has_tool_calls());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": "bad key"}"#)
            .create_async()
            .await;

        let err = client_for(&server).complete(&[], &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::Auth { status: 401 }));
    }

    #[tokio::test]
    async fn test_api_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v1/chat/completions")
            .with_status(400)
            .with_body(r#"{"error": "Invalid request"}"#)
            .create_async()
            .await;

        let err = client_for(&server).complete(&[], &[]).await.unwrap_err();
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("Invalid request"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_choices() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let err = client_for(&server).complete(&[], &[]).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_message_translation() {
        let assistant = ChatMessage::Assistant(AssistantContent {
            text: None,
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                name: "get_random_meal".to_string(),
                arguments: json!({}),
            }],
        });
        let value = message_to_openai(&assistant);
        assert_eq!(value["role"], "assistant");
        assert!(value["content"].is_null());
        assert_eq!(value["tool_calls"][0]["function"]["arguments"], "{}");

        let tool = ChatMessage::Tool(ToolResult {
            tool_call_id: "call_1".to_string(),
            content: "{}".to_string(),
            is_error: false,
        });
        assert_eq!(
            message_to_openai(&tool),
            json!({"role": "tool", "tool_call_id": "call_1", "content": "{}"})
        );
    }

    #[test]
    fn test_request_body_tools() {
        let client = OpenAiChatClient::new(&LlmConfig {
            endpoint: "https://openrouter.ai/api/v1".to_string(),
            api_key: "k".to_string(),
            model: "m".to_string(),
            timeout: Duration::from_secs(5),
            temperature: Some(0.2),
            max_tokens: None,
        })
        .unwrap();

        let body = client.request_body(&[ChatMessage::System("chef".to_string())], &[random_meal_tool()]);
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "chef"}));
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "get_random_meal");
        assert!(body["temperature"].is_number());
        assert!(body.get("max_tokens").is_none());
        assert_eq!(client.completions_url(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn test_decode_arguments() {
        assert_eq!(decode_arguments(""), json!({}));
        assert_eq!(decode_arguments(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(decode_arguments("{oops"), json!("{oops"));
    }
}
