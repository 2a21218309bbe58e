//! The agent loop
//!
//! Flow: task → model → tool calls → middleware → tools → results → model
//! → ... → final text. Tool calls run one at a time, in the order the model
//! asked for them.

use std::sync::Arc;

use crate::agent::conversation::Conversation;
use crate::agent::middleware::{FunctionMiddleware, MiddlewarePipeline};
use crate::agent::registry::ToolRegistry;
use crate::agent::tool::{Tool, ToolCall, ToolResult};
use crate::error::{AgentError, ToolError};
use crate::llm::ChatClient;

const DEFAULT_MAX_ITERATIONS: usize = 8;

/// An LLM-backed agent with tools and invocation middleware
pub struct ChatAgent {
    name: String,
    description: String,
    instructions: String,
    client: Arc<dyn ChatClient>,
    registry: ToolRegistry,
    pipeline: MiddlewarePipeline,
    max_iterations: usize,
}

impl ChatAgent {
    pub fn builder(name: impl Into<String>, client: Arc<dyn ChatClient>) -> ChatAgentBuilder {
        ChatAgentBuilder {
            name: name.into(),
            description: String::new(),
            instructions: String::new(),
            client,
            tools: Vec::new(),
            middleware: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one user turn and return the model's final text
    pub async fn run(&self, task: &str) -> Result<String, AgentError> {
        let mut conversation = Conversation::with_instructions(&self.instructions);
        conversation.add_user_message(task);

        let tools = self.registry.definitions();

        for iteration in 0..self.max_iterations {
            tracing::debug!(agent = %self.name, iteration, provider = self.client.provider_name(), "Agent iteration");

            let reply = self.client.complete(conversation.messages(), &tools).await?;
            let calls = reply.tool_calls.clone();
            let text = reply.text.clone();
            conversation.add_assistant_response(reply);

            if calls.is_empty() {
                tracing::info!(agent = %self.name, iteration, "Agent turn complete");
                return Ok(text.unwrap_or_default());
            }

            for call in &calls {
                let result = self.invoke(call).await;
                conversation.add_tool_result(result);
            }
        }

        tracing::warn!(agent = %self.name, max = self.max_iterations, "Agent gave up without a final answer");
        Err(AgentError::MaxIterations(self.max_iterations))
    }

    /// Invoke one tool call through the middleware chain.
    ///
    /// Never fails: unknown tools and tool errors become error results the
    /// model can read.
    pub async fn invoke(&self, call: &ToolCall) -> ToolResult {
        let outcome = match self.registry.get(&call.name) {
            Some(tool) => self.pipeline.invoke(tool.as_ref(), call.arguments.clone()).await,
            None => Err(ToolError::UnknownTool {
                name: call.name.clone(),
            }),
        };
        ToolResult::from_outcome(call.id.clone(), outcome)
    }
}

/// Builder for [`ChatAgent`]
pub struct ChatAgentBuilder {
    name: String,
    description: String,
    instructions: String,
    client: Arc<dyn ChatClient>,
    tools: Vec<Arc<dyn Tool>>,
    middleware: Vec<Arc<dyn FunctionMiddleware>>,
    max_iterations: usize,
}

impl ChatAgentBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// System instructions, sent to the model unmodified
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add a middleware; the first added runs outermost
    pub fn middleware(mut self, middleware: Arc<dyn FunctionMiddleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    pub fn build(self) -> Result<ChatAgent, ToolError> {
        let mut registry = ToolRegistry::new();
        for tool in self.tools {
            registry.register(tool)?;
        }

        Ok(ChatAgent {
            name: self.name,
            description: self.description,
            instructions: self.instructions,
            client: self.client,
            registry,
            pipeline: MiddlewarePipeline::new(self.middleware),
            max_iterations: self.max_iterations,
        })
    }
}
