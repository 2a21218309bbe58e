//! FoodAgent composition
//!
//! Binds the recipe tools, the chef instructions, and the logging middleware
//! into a [`ChatAgent`]. Every collaborator is passed in.

pub mod prompt;
pub mod tools;

use std::sync::Arc;

use crate::agent::{ChatAgent, LoggingMiddleware};
use crate::config::AgentConfig;
use crate::error::ToolError;
use crate::llm::ChatClient;
use crate::mealdb::MealDbClient;

pub use prompt::{AGENT_DESCRIPTION, AGENT_INSTRUCTIONS, AGENT_NAME};
pub use tools::{MealByNameTool, RandomMealTool};

/// Build the FoodAgent
pub fn build_food_agent(
    client: Arc<dyn ChatClient>,
    meal_db: Arc<MealDbClient>,
    config: &AgentConfig,
) -> Result<ChatAgent, ToolError> {
    ChatAgent::builder(AGENT_NAME, client)
        .description(AGENT_DESCRIPTION)
        .instructions(AGENT_INSTRUCTIONS)
        .tool(Arc::new(RandomMealTool::new(meal_db.clone())))
        .tool(Arc::new(MealByNameTool::new(meal_db)))
        .middleware(Arc::new(LoggingMiddleware))
        .max_iterations(config.max_iterations)
        .build()
}
