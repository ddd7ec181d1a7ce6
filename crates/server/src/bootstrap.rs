use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use lunchmate_agent::{AdvisorError, GeminiClient, LlmAdvisor, MenuAdvisor};
use lunchmate_core::config::{AdvisorProvider, AppConfig, ConfigError};
use lunchmate_core::errors::WeatherError;
use lunchmate_core::menu::RuleBasedRecommender;
use lunchmate_core::weather::WeatherProvider;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{self, ApiState};
use crate::health;
use crate::weather::OpenMeteoClient;

pub struct Application {
    pub config: AppConfig,
    pub weather: Arc<dyn WeatherProvider>,
    pub advisor: Arc<dyn MenuAdvisor>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("weather client setup failed: {0}")]
    Weather(#[source] WeatherError),
    #[error("advisor client setup failed: {0}")]
    AdvisorClient(String),
    #[error("advisor setup failed: {0}")]
    Advisor(#[source] AdvisorError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let weather = OpenMeteoClient::from_config(&config.weather).map_err(BootstrapError::Weather)?;
    let advisor = select_advisor(&config)?;

    info!(
        event_name = "system.bootstrap.advisor_selected",
        correlation_id = "bootstrap",
        advisor = advisor.name(),
        requested_provider = config.advisor.provider.as_str(),
        weather_base_url = %config.weather.base_url,
        "advisor selected"
    );

    Ok(Application { config, weather: Arc::new(weather), advisor })
}

fn select_advisor(config: &AppConfig) -> Result<Arc<dyn MenuAdvisor>, BootstrapError> {
    match config.advisor.effective_provider() {
        AdvisorProvider::Gemini => {
            let client = GeminiClient::from_config(&config.advisor)
                .map_err(|error| BootstrapError::AdvisorClient(format!("{error:#}")))?;
            info!(
                event_name = "system.bootstrap.advisor_client",
                correlation_id = "bootstrap",
                model = client.model(),
                "gemini client configured"
            );
            let advisor =
                LlmAdvisor::new(Arc::new(client), Duration::from_secs(config.advisor.timeout_secs))
                    .map_err(BootstrapError::Advisor)?;
            Ok(Arc::new(advisor))
        }
        AdvisorProvider::RuleBased => {
            if config.advisor.provider == AdvisorProvider::Gemini {
                warn!(
                    event_name = "system.bootstrap.advisor_unavailable",
                    correlation_id = "bootstrap",
                    "no advisor api key configured, using rule-based recommendations"
                );
            }
            Ok(Arc::new(RuleBasedRecommender::new()))
        }
    }
}

impl Application {
    pub fn router(&self) -> Router {
        api::router(ApiState::new(self.weather.clone(), self.advisor.clone()))
            .merge(health::router(self.advisor.name()))
            .layer(CatchPanicLayer::custom(api::panic_response))
            .layer(api::cors_layer(&self.config.server.cors_allowed_origins))
            .layer(TraceLayer::new_for_http())
    }
}
