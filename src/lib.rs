//! Recipe Agent MCP Server Library
//!
//! Exposes an LLM-backed chef agent as a Model Context Protocol tool. The
//! agent answers recipe questions by looking dishes up in TheMealDB.

pub mod agent;
pub mod config;
pub mod error;
pub mod food;
pub mod llm;
pub mod mcp;
pub mod mealdb;

pub use config::Config;
pub use error::{RecipeMcpError, Result};
