//! Agent module
//!
//! A small tool-calling agent: tools and their registry, the invocation
//! middleware chain, conversation history, and the loop that drives a chat
//! model until it produces a final answer.

pub mod conversation;
pub mod middleware;
pub mod registry;
pub mod runtime;
pub mod tool;

pub use middleware::{FunctionInvocationContext, FunctionMiddleware, LoggingMiddleware, Next};
pub use runtime::{ChatAgent, ChatAgentBuilder};
pub use tool::{Tool, ToolCall, ToolDefinition, ToolResult};
