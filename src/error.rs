//! Error types for the Recipe Agent MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Recipe Agent MCP Server
#[derive(Error, Debug)]
pub enum RecipeMcpError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Agent loop errors
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// Tool registration and invocation errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration errors. These are the only errors allowed to stop the process.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// TheMealDB lookup errors
#[derive(Error, Debug)]
pub enum MealDbError {
    /// Network failure, non-2xx status, or an undecodable body
    #[error("{message}")]
    Transport { message: String },

    /// The random endpoint returned no meal
    #[error("No meal found.")]
    EmptyResult,

    /// A search ran successfully but matched nothing
    #[error("No meals found with the name '{query}'.")]
    NotFound { query: String },
}

impl From<reqwest::Error> for MealDbError {
    fn from(err: reqwest::Error) -> Self {
        MealDbError::Transport {
            message: err.to_string(),
        }
    }
}

/// Tool errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Tool with name '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("Middleware did not forward the call to {function}")]
    NotForwarded { function: String },
}

/// Chat completion errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Authentication failed ({status})")]
    Auth { status: u16 },

    #[error("Rate limited by the chat endpoint")]
    RateLimited,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

/// Agent loop errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("No final answer after {0} iterations")]
    MaxIterations(usize),
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },
}

/// Result type alias for Recipe Agent MCP operations
pub type Result<T> = std::result::Result<T, RecipeMcpError>;
