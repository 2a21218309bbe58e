//! TheMealDB API client
//!
//! Two lookups, random dish and dish by name. The `fetch_*` operations never
//! fail: every outcome is folded into a [`LookupEnvelope`].

use std::time::Duration;

use crate::config::MealDbConfig;
use crate::error::{MealDbError, Result};
use crate::mealdb::normalize::normalize;
use crate::mealdb::types::{LookupEnvelope, MealsResponse, NormalizedMeal, RawMeal, MAX_SEARCH_RESULTS};

/// Pause before retrying a transient failure
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// TheMealDB API client
#[derive(Debug, Clone)]
pub struct MealDbClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// API base URL without trailing slash
    base_url: String,

    /// Extra attempts on transient failures
    retries: u32,
}

impl MealDbClient {
    /// Create a new client with a bounded request timeout
    pub fn new(config: &MealDbConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retries: config.retries,
        })
    }

    /// URL of the random meal endpoint
    pub fn random_url(&self) -> String {
        format!("{}/random.php", self.base_url)
    }

    /// URL of the search endpoint with the query percent-encoded
    pub fn search_url(&self, query: &str) -> String {
        format!("{}/search.php?s={}", self.base_url, urlencoding::encode(query))
    }

    // ==================== Envelope Operations ====================

    /// Fetch a random meal for the agent
    pub async fn fetch_random(&self) -> LookupEnvelope {
        match self.random_meal().await {
            Ok(meal) => LookupEnvelope::Single(meal),
            Err(MealDbError::EmptyResult) => LookupEnvelope::error(MealDbError::EmptyResult.to_string()),
            Err(e) => LookupEnvelope::error(format!("Failed to fetch random meal: {}", e)),
        }
    }

    /// Search meals by name for the agent
    pub async fn fetch_by_name(&self, query: &str) -> LookupEnvelope {
        match self.search_meals(query).await {
            Ok(meals) => LookupEnvelope::List(meals),
            Err(e @ MealDbError::NotFound { .. }) => LookupEnvelope::not_found(e.to_string()),
            Err(e) => LookupEnvelope::error(format!("Failed to search for meal: {}", e)),
        }
    }

    // ==================== Typed Operations ====================

    /// Get one random meal.
    ///
    /// An empty result is [`MealDbError::EmptyResult`].
    pub async fn random_meal(&self) -> std::result::Result<NormalizedMeal, MealDbError> {
        let meals = self.get_meals(&self.random_url()).await?;
        meals
            .first()
            .map(normalize)
            .ok_or(MealDbError::EmptyResult)
    }

    /// Search meals by name, keeping the first [`MAX_SEARCH_RESULTS`] in API order.
    ///
    /// Zero matches is [`MealDbError::NotFound`].
    pub async fn search_meals(
        &self,
        query: &str,
    ) -> std::result::Result<Vec<NormalizedMeal>, MealDbError> {
        let meals = self.get_meals(&self.search_url(query)).await?;
        if meals.is_empty() {
            return Err(MealDbError::NotFound {
                query: query.to_string(),
            });
        }

        Ok(meals.iter().take(MAX_SEARCH_RESULTS).map(normalize).collect())
    }

    /// GET a meals endpoint, retrying timeouts and connection failures
    async fn get_meals(&self, url: &str) -> std::result::Result<Vec<RawMeal>, MealDbError> {
        let mut attempt = 0;
        loop {
            match self.get_meals_once(url).await {
                Ok(meals) => return Ok(meals),
                Err(e) if attempt < self.retries && (e.is_timeout() || e.is_connect()) => {
                    attempt += 1;
                    tracing::warn!(url, attempt, "Retrying MealDB request: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn get_meals_once(&self, url: &str) -> std::result::Result<Vec<RawMeal>, reqwest::Error> {
        tracing::debug!(url, "MealDB request");

        let response = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let body: MealsResponse = response.json().await?;
        Ok(body.into_meals())
    }
}
