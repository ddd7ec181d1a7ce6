use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lunchmate_core::domain::preferences::Preferences;
use lunchmate_core::domain::recipe::Recipe;
use lunchmate_core::domain::recommendation::{CafeteriaRecommendation, MenuRecommendation};
use lunchmate_core::domain::weather::WeatherReading;
use lunchmate_core::menu::RuleBasedRecommender;
use thiserror::Error;
use tracing::debug;

use crate::guardrails::{accept_cafeteria, accept_menu, accept_recipe};
use crate::llm::LlmClient;
use crate::prompts::PromptRenderer;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor did not answer within {0:?}")]
    Timeout(Duration),
    #[error("advisor request failed: {0}")]
    Transport(String),
    #[error("advisor output is not valid JSON: {0}")]
    Malformed(String),
    #[error("advisor output rejected ({reason_code}): {detail}")]
    SchemaViolation { reason_code: &'static str, detail: String },
    #[error("prompt rendering failed: {0}")]
    Prompt(String),
}

impl AdvisorError {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "advisor_timeout",
            Self::Transport(_) => "advisor_transport",
            Self::Malformed(_) => "advisor_malformed_output",
            Self::SchemaViolation { reason_code, .. } => reason_code,
            Self::Prompt(_) => "prompt_render_failed",
        }
    }
}

/// Anything able to produce lunch recommendations and recipes.
#[async_trait]
pub trait MenuAdvisor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn recommend(
        &self,
        weather: &WeatherReading,
        preferences: &Preferences,
    ) -> Result<MenuRecommendation, AdvisorError>;

    async fn recommend_from_cafeteria(
        &self,
        weather: &WeatherReading,
        cafeteria_menu: &str,
    ) -> Result<CafeteriaRecommendation, AdvisorError>;

    async fn recipe(&self, menu_name: &str, servings: u32) -> Result<Recipe, AdvisorError>;
}

#[async_trait]
impl MenuAdvisor for RuleBasedRecommender {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    async fn recommend(
        &self,
        weather: &WeatherReading,
        preferences: &Preferences,
    ) -> Result<MenuRecommendation, AdvisorError> {
        Ok(RuleBasedRecommender::recommend(self, weather, preferences))
    }

    async fn recommend_from_cafeteria(
        &self,
        weather: &WeatherReading,
        cafeteria_menu: &str,
    ) -> Result<CafeteriaRecommendation, AdvisorError> {
        Ok(RuleBasedRecommender::recommend_from_cafeteria(self, weather, cafeteria_menu))
    }

    async fn recipe(&self, menu_name: &str, servings: u32) -> Result<Recipe, AdvisorError> {
        Ok(RuleBasedRecommender::recipe(self, menu_name, servings))
    }
}

/// Advisor backed by a generative language model.
pub struct LlmAdvisor {
    client: Arc<dyn LlmClient>,
    prompts: PromptRenderer,
    timeout: Duration,
}

impl LlmAdvisor {
    pub fn new(client: Arc<dyn LlmClient>, timeout: Duration) -> Result<Self, AdvisorError> {
        let prompts = PromptRenderer::new().map_err(prompt_error)?;
        Ok(Self { client, prompts, timeout })
    }

    async fn ask(&self, prompt: String) -> Result<String, AdvisorError> {
        let started = tokio::time::Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.client.complete(&prompt))
            .await
            .map_err(|_| AdvisorError::Timeout(self.timeout))?;
        let text = outcome.map_err(|error| AdvisorError::Transport(format!("{error:#}")))?;

        debug!(
            event_name = "advisor.completed",
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_chars = text.chars().count(),
            "advisor answered"
        );
        Ok(text)
    }
}

fn prompt_error(error: tera::Error) -> AdvisorError {
    AdvisorError::Prompt(error.to_string())
}

#[async_trait]
impl MenuAdvisor for LlmAdvisor {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn recommend(
        &self,
        weather: &WeatherReading,
        preferences: &Preferences,
    ) -> Result<MenuRecommendation, AdvisorError> {
        let prompt = self.prompts.lunch(weather, preferences).map_err(prompt_error)?;
        let raw = self.ask(prompt).await?;
        accept_menu(&raw, weather)
    }

    async fn recommend_from_cafeteria(
        &self,
        weather: &WeatherReading,
        cafeteria_menu: &str,
    ) -> Result<CafeteriaRecommendation, AdvisorError> {
        let prompt = self.prompts.cafeteria(weather, cafeteria_menu).map_err(prompt_error)?;
        let raw = self.ask(prompt).await?;
        accept_cafeteria(&raw, weather, cafeteria_menu)
    }

    async fn recipe(&self, menu_name: &str, servings: u32) -> Result<Recipe, AdvisorError> {
        let prompt = self.prompts.recipe(menu_name, servings).map_err(prompt_error)?;
        let raw = self.ask(prompt).await?;
        accept_recipe(&raw, servings)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use crate::llm::LlmClient;

    /// Replies with a canned answer and records every prompt it receives.
    pub struct ScriptedLlm {
        reply: Result<String, String>,
        delay: Option<Duration>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        pub fn replying(reply: &str) -> Self {
            Self { reply: Ok(reply.to_string()), delay: None, prompts: Mutex::new(Vec::new()) }
        }

        pub fn failing(message: &str) -> Self {
            Self { reply: Err(message.to_string()), delay: None, prompts: Mutex::new(Vec::new()) }
        }

        pub fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().ok().and_then(|prompts| prompts.last().cloned())
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone().map_err(|message| anyhow!(message))
        }
    }
}
