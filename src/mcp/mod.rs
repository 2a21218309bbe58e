//! MCP (Model Context Protocol) module
//!
//! Serves the agent to desktop clients as a tool over stdio.

pub mod server;
pub mod tools;
pub mod types;
