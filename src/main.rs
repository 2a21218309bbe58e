//! Recipe Agent MCP Server - Rust Implementation
//!
//! Exposes the FoodAgent, an LLM-backed chef with TheMealDB lookups, as a
//! Model Context Protocol tool over stdio.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use recipe_agent_mcp::agent::ChatAgent;
use recipe_agent_mcp::config::Config;
use recipe_agent_mcp::error::Result;
use recipe_agent_mcp::food::build_food_agent;
use recipe_agent_mcp::llm::OpenAiChatClient;
use recipe_agent_mcp::mcp::server::McpServer;
use recipe_agent_mcp::mcp::tools::ToolHandler;
use recipe_agent_mcp::mealdb::MealDbClient;

/// Recipe Agent MCP Server
#[derive(Parser)]
#[command(name = "recipe-agent-mcp")]
#[command(author, version, about = "Recipe Agent MCP Server - an AI chef exposed as an MCP tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single agent task and print the answer
    Ask {
        /// What to ask the chef
        task: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for MCP messages
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration, failing fast on missing settings
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e);
        }
    };

    let agent = Arc::new(build_agent(&config)?);

    match cli.command {
        Some(Commands::Ask { task }) => {
            let answer = agent.run(&task).await?;
            println!("{}", answer);
        }
        None => {
            let mut server = McpServer::new(ToolHandler::new(agent));
            server.run_stdio().await?;
        }
    }

    Ok(())
}

fn build_agent(config: &Config) -> Result<ChatAgent> {
    let chat_client = Arc::new(OpenAiChatClient::new(&config.llm)?);
    let meal_db = Arc::new(MealDbClient::new(&config.mealdb)?);

    tracing::info!(
        model = chat_client.model(),
        mealdb = %config.mealdb.base_url,
        "Starting FoodAgent"
    );

    Ok(build_food_agent(chat_client, meal_db, &config.agent)?)
}
