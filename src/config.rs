//! Configuration management for the Recipe Agent MCP Server
//!
//! Settings come from the process environment, then from `.env` files.
//! The resulting [`Config`] is built once at startup and handed to every
//! component that needs it.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Environment variable names
pub mod vars {
    pub const LLM_ENDPOINT: &str = "OPENROUTER_ENDPOINT";
    pub const LLM_API_KEY: &str = "OPENROUTER_API_KEY";
    pub const LLM_MODEL: &str = "OPENROUTER_MODEL";
    pub const LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
    pub const MEALDB_BASE_URL: &str = "MEALDB_BASE_URL";
    pub const MEALDB_TIMEOUT_SECS: &str = "MEALDB_TIMEOUT_SECS";
    pub const MEALDB_RETRIES: &str = "MEALDB_RETRIES";
    pub const AGENT_MAX_ITERATIONS: &str = "AGENT_MAX_ITERATIONS";
}

/// TheMealDB API constants
pub mod mealdb {
    /// Base URL for TheMealDB v1 API with the public test key
    pub const API_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_RETRIES: u32 = 1;
}

/// Chat model defaults
pub mod llm {
    pub const DEFAULT_MODEL: &str = "nvidia/nemotron-3-nano-30b-a3b:free";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
}

const DEFAULT_MAX_ITERATIONS: usize = 8;

/// Configuration for the Recipe Agent MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub mealdb: MealDbConfig,
    pub agent: AgentConfig,
}

/// OpenAI-compatible chat endpoint settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base endpoint, e.g. `https://openrouter.ai/api/v1`
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// TheMealDB client settings
#[derive(Debug, Clone)]
pub struct MealDbConfig {
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Extra attempts after a timeout or connection failure
    pub retries: u32,
}

impl Default for MealDbConfig {
    fn default() -> Self {
        Self {
            base_url: mealdb::API_BASE_URL.to_string(),
            timeout: Duration::from_secs(mealdb::DEFAULT_TIMEOUT_SECS),
            retries: mealdb::DEFAULT_RETRIES,
        }
    }
}

/// Agent loop settings
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub max_iterations: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Config {
    /// Load `.env` files, then build the configuration from the environment.
    ///
    /// Fails fast when a required setting is missing.
    pub fn load() -> Result<Self> {
        load_settings_files();
        Self::from_env()
    }

    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let require = |key: &str| {
            get(key).ok_or_else(|| ConfigError::MissingEnvVar {
                var: key.to_string(),
            })
        };

        let llm = LlmConfig {
            endpoint: require(vars::LLM_ENDPOINT)?,
            api_key: require(vars::LLM_API_KEY)?,
            model: get(vars::LLM_MODEL).unwrap_or_else(|| llm::DEFAULT_MODEL.to_string()),
            timeout: Duration::from_secs(parse_or(
                vars::LLM_TIMEOUT_SECS,
                get(vars::LLM_TIMEOUT_SECS),
                llm::DEFAULT_TIMEOUT_SECS,
            )?),
            temperature: None,
            max_tokens: None,
        };

        let mealdb = MealDbConfig {
            base_url: get(vars::MEALDB_BASE_URL)
                .unwrap_or_else(|| mealdb::API_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_or(
                vars::MEALDB_TIMEOUT_SECS,
                get(vars::MEALDB_TIMEOUT_SECS),
                mealdb::DEFAULT_TIMEOUT_SECS,
            )?),
            retries: parse_or(
                vars::MEALDB_RETRIES,
                get(vars::MEALDB_RETRIES),
                mealdb::DEFAULT_RETRIES,
            )?,
        };

        let agent = AgentConfig {
            max_iterations: parse_or(
                vars::AGENT_MAX_ITERATIONS,
                get(vars::AGENT_MAX_ITERATIONS),
                DEFAULT_MAX_ITERATIONS,
            )?,
        };

        Ok(Self { llm, mealdb, agent })
    }

    /// Location of the per-user settings file
    pub fn user_settings_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".recipe-agent-mcp").join("config.env"))
    }
}

/// Load `./.env` (searched upward) and the per-user settings file.
///
/// Variables already present in the environment are never overridden.
fn load_settings_files() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded settings file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    if let Some(path) = Config::user_settings_path().filter(|p| p.exists()) {
        if let Err(e) = dotenvy::from_path(&path) {
            tracing::warn!(path = %path.display(), "Ignoring unreadable settings file: {}", e);
        }
    }
}

fn parse_or<T>(var: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            ConfigError::InvalidValue {
                var: var.to_string(),
                message: e.to_string(),
            }
            .into()
        }),
    }
}
