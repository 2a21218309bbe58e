//! TheMealDB module
//!
//! Contains the raw and normalized meal types, the record normalizer, and
//! the HTTP client for the two lookups the agent can make.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::MealDbClient;
pub use normalize::normalize;
pub use types::{LookupEnvelope, NormalizedMeal, RawMeal};
