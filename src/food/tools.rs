//! Recipe tools
//!
//! The two lookups the FoodAgent may call. Both return the serialized lookup
//! envelope; only malformed arguments are reported as tool errors.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::agent::tool::{schema_for, Tool, ToolDefinition};
use crate::error::ToolError;
use crate::mealdb::MealDbClient;

pub const GET_RANDOM_MEAL: &str = "get_random_meal";
pub const GET_MEAL_BY_NAME: &str = "get_meal_by_name";

/// Random surprise recipe
pub struct RandomMealTool {
    client: Arc<MealDbClient>,
}

impl RandomMealTool {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for RandomMealTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: GET_RANDOM_MEAL.to_string(),
            description: "Retrieves a random meal recipe from the database. Useful when the user \
                wants a surprise suggestion or explicitly asks for a random recommendation. \
                Returns a JSON string containing the meal name, ingredients, and cooking instructions."
                .to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        }
    }

    async fn invoke(&self, _arguments: Value) -> Result<String, ToolError> {
        Ok(self.client.fetch_random().await.to_json())
    }
}

/// Arguments of `get_meal_by_name`
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct MealByNameArgs {
    /// The name of the meal to search for (e.g., 'Arrabiata', 'Burger').
    #[validate(custom = "not_blank")]
    pub meal_name: String,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Look up a specific named dish
pub struct MealByNameTool {
    client: Arc<MealDbClient>,
}

impl MealByNameTool {
    pub fn new(client: Arc<MealDbClient>) -> Self {
        Self { client }
    }

    fn parse_args(arguments: Value) -> Result<MealByNameArgs, ToolError> {
        let invalid = |message: String| ToolError::InvalidArguments {
            tool: GET_MEAL_BY_NAME.to_string(),
            message,
        };

        let args: MealByNameArgs =
            serde_json::from_value(arguments).map_err(|e| invalid(e.to_string()))?;
        args.validate()
            .map_err(|_| invalid("meal_name must not be blank".to_string()))?;
        Ok(args)
    }
}

#[async_trait]
impl Tool for MealByNameTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: GET_MEAL_BY_NAME.to_string(),
            description: "Searches for a specific meal recipe by name. Use this when the user asks \
                for a specific dish or wants to know how to cook a named item. Returns a JSON \
                string containing a list of matching meals with their details."
                .to_string(),
            input_schema: schema_for::<MealByNameArgs>(),
        }
    }

    async fn invoke(&self, arguments: Value) -> Result<String, ToolError> {
        let args = Self::parse_args(arguments)?;
        Ok(self.client.fetch_by_name(&args.meal_name).await.to_json())
    }
}
