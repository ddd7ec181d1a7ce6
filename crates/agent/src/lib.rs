//! Advisor runtime for lunch recommendations.
//!
//! This crate wraps the generative advisor behind the [`advisor::MenuAdvisor`]
//! capability:
//! - `llm` talks to the language model
//! - `prompts` renders the lunch, cafeteria and recipe prompts
//! - `guardrails` validates whatever comes back
//! - `runtime` falls back to the rule-based recommender on any failure
//!
//! The model only proposes menus. It never decides the weather block or
//! the shape of a response; both come from local data.

pub mod advisor;
pub mod guardrails;
pub mod llm;
pub mod prompts;
pub mod runtime;

pub use advisor::{AdvisorError, LlmAdvisor, MenuAdvisor};
pub use llm::{GeminiClient, LlmClient};
pub use runtime::{RecipeEngine, RecommendationEngine};
