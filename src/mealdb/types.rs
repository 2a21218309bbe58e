//! TheMealDB type definitions
//!
//! Raw API shapes on one side, the flattened records and result envelopes
//! handed to the agent on the other.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Highest ingredient/measure index the API ever returns
pub const MAX_INGREDIENTS: usize = 20;

/// Maximum number of search matches returned to the agent
pub const MAX_SEARCH_RESULTS: usize = 3;

/// Top-level response of `random.php` and `search.php`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealsResponse {
    /// `null` when nothing matched
    #[serde(default)]
    pub meals: Option<Vec<RawMeal>>,
}

impl MealsResponse {
    /// Meals in API order, empty when the API returned `null`
    pub fn into_meals(self) -> Vec<RawMeal> {
        self.meals.unwrap_or_default()
    }
}

/// A meal exactly as TheMealDB returns it.
///
/// Kept as an open map so unexpected or non-string values never fail
/// deserialization of the whole response. A `null` or non-object entry
/// reads as an empty meal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawMeal(HashMap<String, Value>);

impl<'de> Deserialize<'de> for RawMeal {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Object(map) => Self(map.into_iter().collect()),
            _ => Self::default(),
        })
    }
}

impl RawMeal {
    /// Build from `(key, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    /// String value of a field; `null` and non-string values read as absent
    pub fn field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn id(&self) -> Option<&str> {
        self.field("idMeal")
    }

    pub fn name(&self) -> Option<&str> {
        self.field("strMeal")
    }

    pub fn category(&self) -> Option<&str> {
        self.field("strCategory")
    }

    pub fn area(&self) -> Option<&str> {
        self.field("strArea")
    }

    pub fn instructions(&self) -> Option<&str> {
        self.field("strInstructions")
    }

    pub fn tags(&self) -> Option<&str> {
        self.field("strTags")
    }

    pub fn video_link(&self) -> Option<&str> {
        self.field("strYoutube")
    }

    /// Ingredient at a 1-based index
    pub fn ingredient(&self, index: usize) -> Option<&str> {
        self.field(&format!("strIngredient{}", index))
    }

    /// Measure at a 1-based index
    pub fn measure(&self, index: usize) -> Option<&str> {
        self.field(&format!("strMeasure{}", index))
    }
}

/// Flattened meal record handed to the agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMeal {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,

    /// `"<measure> <ingredient>"` entries in API index order
    pub ingredients: Vec<String>,

    pub tags: Option<String>,

    #[serde(rename = "youtube_link")]
    pub video_link: Option<String>,
}

/// Result of a lookup operation, serialized as text for the agent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LookupEnvelope {
    /// Lookup or transport failure
    Error { error: String },

    /// Search succeeded with zero matches
    NotFound { status: String, message: String },

    /// Random lookup success
    Single(NormalizedMeal),

    /// Name search success, at most [`MAX_SEARCH_RESULTS`] meals
    List(Vec<NormalizedMeal>),
}

impl LookupEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        LookupEnvelope::Error {
            error: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        LookupEnvelope::NotFound {
            status: "not_found".to_string(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LookupEnvelope::Error { .. })
    }

    /// Pretty JSON with 2-space indentation
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("Failed to serialize result: {}", e) })
                .to_string()
        })
    }
}
