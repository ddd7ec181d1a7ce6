//! Orchestration around the configured advisor.
//!
//! Callers always get an answer: any advisor failure is logged and replaced
//! by the rule-based result for the same inputs.

use std::sync::Arc;

use lunchmate_core::domain::preferences::Preferences;
use lunchmate_core::domain::recipe::Recipe;
use lunchmate_core::domain::recommendation::{CafeteriaRecommendation, MenuRecommendation};
use lunchmate_core::domain::weather::WeatherReading;
use lunchmate_core::menu::RuleBasedRecommender;
use tracing::{info, warn};

use crate::advisor::{AdvisorError, MenuAdvisor};

fn log_fallback(operation: &'static str, advisor: &'static str, error: &AdvisorError) {
    warn!(
        event_name = "advisor.fallback",
        operation,
        advisor,
        reason_code = error.reason_code(),
        error = %error,
        "advisor failed, using rule-based result"
    );
}

#[derive(Clone)]
pub struct RecommendationEngine {
    primary: Arc<dyn MenuAdvisor>,
    fallback: RuleBasedRecommender,
}

impl RecommendationEngine {
    pub fn new(primary: Arc<dyn MenuAdvisor>) -> Self {
        Self { primary, fallback: RuleBasedRecommender::new() }
    }

    pub fn rule_based() -> Self {
        Self::new(Arc::new(RuleBasedRecommender::new()))
    }

    pub fn advisor_name(&self) -> &'static str {
        self.primary.name()
    }

    pub async fn recommend(
        &self,
        weather: &WeatherReading,
        preferences: &Preferences,
    ) -> MenuRecommendation {
        match self.primary.recommend(weather, preferences).await {
            Ok(mut recommendation) => {
                recommendation.weather_info = weather.info();
                info!(
                    event_name = "recommendation.completed",
                    advisor = self.primary.name(),
                    menu = %recommendation.menu,
                    "menu recommended"
                );
                recommendation
            }
            Err(error) => {
                log_fallback("recommend", self.primary.name(), &error);
                self.fallback.recommend(weather, preferences)
            }
        }
    }

    pub async fn recommend_from_cafeteria(
        &self,
        weather: &WeatherReading,
        cafeteria_menu: &str,
    ) -> CafeteriaRecommendation {
        match self.primary.recommend_from_cafeteria(weather, cafeteria_menu).await {
            Ok(mut recommendation) => {
                recommendation.weather_info = weather.info();
                recommendation.cafeteria_menu = cafeteria_menu.to_string();
                info!(
                    event_name = "cafeteria_recommendation.completed",
                    advisor = self.primary.name(),
                    "cafeteria alternatives recommended"
                );
                recommendation
            }
            Err(error) => {
                log_fallback("recommend_from_cafeteria", self.primary.name(), &error);
                self.fallback.recommend_from_cafeteria(weather, cafeteria_menu)
            }
        }
    }
}

#[derive(Clone)]
pub struct RecipeEngine {
    primary: Arc<dyn MenuAdvisor>,
    fallback: RuleBasedRecommender,
}

impl RecipeEngine {
    pub fn new(primary: Arc<dyn MenuAdvisor>) -> Self {
        Self { primary, fallback: RuleBasedRecommender::new() }
    }

    /// Serving counts below one are raised to one before either path runs.
    pub async fn recipe(&self, menu_name: &str, servings: u32) -> Recipe {
        let servings = servings.max(1);
        match self.primary.recipe(menu_name, servings).await {
            Ok(mut recipe) => {
                recipe.servings = servings;
                recipe
            }
            Err(error) => {
                log_fallback("recipe", self.primary.name(), &error);
                self.fallback.recipe(menu_name, servings)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use lunchmate_core::domain::preferences::{Category, FoodType, Mood, Preferences};
    use lunchmate_core::domain::recommendation::SlotType;
    use lunchmate_core::domain::weather::{Precipitation, WeatherReading};

    use super::{RecipeEngine, RecommendationEngine};
    use crate::advisor::test_support::ScriptedLlm;
    use crate::advisor::LlmAdvisor;

    fn llm_engine(llm: ScriptedLlm, timeout: Duration) -> (RecommendationEngine, RecipeEngine) {
        let advisor = match LlmAdvisor::new(Arc::new(llm), timeout) {
            Ok(advisor) => Arc::new(advisor),
            Err(error) => panic!("advisor should build: {error}"),
        };
        (RecommendationEngine::new(advisor.clone()), RecipeEngine::new(advisor))
    }

    fn cold_rainy_day() -> WeatherReading {
        let mut weather = WeatherReading::placeholder("인천");
        weather.temperature = 4;
        weather.precipitation = Precipitation::Present;
        weather.note = None;
        weather
    }

    #[tokio::test]
    async fn malformed_advisor_output_falls_back_to_rules() {
        let (engine, _) = llm_engine(ScriptedLlm::replying("점심은 라멘!"), Duration::from_secs(1));
        let weather = cold_rainy_day();
        let preferences =
            Preferences::new(FoodType::Only(Category::Korean), Mood::Neutral, 1, Vec::new());

        let recommendation = engine.recommend(&weather, &preferences).await;

        let warm_korean = ["김치찌개", "된장찌개", "부대찌개", "갈비탕", "육개장"];
        assert!(warm_korean.contains(&recommendation.menu.as_str()));
        assert!(recommendation.temperature_match.contains("비가 내리니"));
        assert_eq!(recommendation.weather_info, weather.info());
    }

    #[tokio::test]
    async fn advisor_timeout_falls_back_for_cafeteria() {
        let llm = ScriptedLlm::replying("{}").delayed(Duration::from_millis(500));
        let (engine, _) = llm_engine(llm, Duration::from_millis(20));
        let weather = cold_rainy_day();

        let recommendation = engine.recommend_from_cafeteria(&weather, "순두부찌개").await;

        assert_eq!(recommendation.cafeteria_menu, "순두부찌개");
        let kinds: Vec<SlotType> = recommendation.recommendations.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SlotType::ORDER.to_vec());
        assert_eq!(recommendation.recommendations[2].menu, "칼국수");
        assert_eq!(recommendation.weather_summary, "4°C, 맑음");
    }

    #[tokio::test]
    async fn advisor_answer_gets_local_weather_info() {
        let llm = ScriptedLlm::replying(
            r#"{"menu": "쌀국수", "category": "아시안", "reason": "따뜻한 국물",
                "temperature_match": "추운 날 딱", "alternatives": []}"#,
        );
        let (engine, _) = llm_engine(llm, Duration::from_secs(1));
        let weather = cold_rainy_day();

        let recommendation = engine.recommend(&weather, &Preferences::default()).await;

        assert_eq!(recommendation.menu, "쌀국수");
        assert_eq!(recommendation.temperature_match, "추운 날 딱");
        assert_eq!(recommendation.weather_info.temperature, 4);
        assert_eq!(recommendation.weather_info.precipitation, Precipitation::Present);
        assert_eq!(engine.advisor_name(), "gemini");
    }

    #[tokio::test]
    async fn recipe_engine_clamps_servings_and_falls_back() {
        let (_, recipes) = llm_engine(ScriptedLlm::failing("503"), Duration::from_secs(1));

        let recipe = recipes.recipe("제육볶음", 0).await;

        assert_eq!(recipe.menu_name, "제육볶음");
        assert_eq!(recipe.servings, 1);
        assert_eq!(recipe.ingredients[0].amount, "200g");
        assert!(recipe.note.is_some());
    }

    #[tokio::test]
    async fn rule_based_engine_reports_its_advisor() {
        let engine = RecommendationEngine::rule_based();
        let weather = WeatherReading::placeholder("서울");

        let recommendation = engine.recommend(&weather, &Preferences::default()).await;

        assert_eq!(engine.advisor_name(), "rule_based");
        assert!(!recommendation.menu.is_empty());
        assert_eq!(recommendation.alternatives.len(), 3);
    }
}
