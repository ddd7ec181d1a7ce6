//! JSON API consumed by the lunch recommender frontend.
//!
//! Endpoints:
//! - `GET  /`                          service banner and endpoint list
//! - `GET  /api/weather?location=`     current weather for a city
//! - `POST /api/recommend`             single menu recommendation
//! - `POST /api/cafeteria/recommend`   three alternatives to a cafeteria menu
//! - `POST /api/recipe`                recipe for a menu

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lunchmate_agent::{MenuAdvisor, RecipeEngine, RecommendationEngine};
use lunchmate_core::domain::preferences::{FoodType, Mood, Preferences};
use lunchmate_core::errors::InterfaceError;
use lunchmate_core::weather::{Coordinates, WeatherProvider, WeatherQuery, DEFAULT_LOCATION};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any as AnyCors, CorsLayer};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::weather::reading_or_placeholder;

#[derive(Clone)]
pub struct ApiState {
    weather: Arc<dyn WeatherProvider>,
    recommendations: RecommendationEngine,
    recipes: RecipeEngine,
}

impl ApiState {
    pub fn new(weather: Arc<dyn WeatherProvider>, advisor: Arc<dyn MenuAdvisor>) -> Self {
        Self {
            weather,
            recommendations: RecommendationEngine::new(advisor.clone()),
            recipes: RecipeEngine::new(advisor),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub food_type: FoodType,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default = "default_count")]
    pub num_people: u32,
    #[serde(default)]
    pub moods: Option<Vec<Mood>>,
}

#[derive(Debug, Deserialize)]
pub struct CafeteriaRequest {
    #[serde(default = "default_location")]
    pub location: String,
    pub cafeteria_menu: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CafeteriaRequest {
    fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub menu_name: String,
    #[serde(default = "default_count")]
    pub num_servings: u32,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: IndexEndpoints,
}

#[derive(Debug, Serialize)]
pub struct IndexEndpoints {
    pub weather: &'static str,
    pub recommend: &'static str,
    pub cafeteria: &'static str,
    pub recipe: &'static str,
    pub health: &'static str,
}

/// Error surfaced to API callers as `{detail}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: InterfaceError,
}

impl ApiError {
    fn bad_request(message: impl Into<String>, correlation_id: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: InterfaceError::bad_request(message, correlation_id),
        }
    }

    fn rejected(status: StatusCode, message: String, correlation_id: &str) -> Self {
        Self { status, error: InterfaceError::bad_request(message, correlation_id) }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text(), &new_correlation_id())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text(), &new_correlation_id())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(
            event_name = "api.request_rejected",
            correlation_id = self.error.correlation_id(),
            status = self.status.as_u16(),
            error = %self.error,
            "request rejected"
        );
        (self.status, Json(ErrorBody { detail: self.error.detail() })).into_response()
    }
}

fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/weather", get(weather))
        .route("/api/recommend", post(recommend))
        .route("/api/cafeteria/recommend", post(recommend_from_cafeteria))
        .route("/api/recipe", post(recipe))
        .with_state(state)
}

/// CORS policy for the configured frontend origins; unparsable origins are
/// skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AnyCors)
        .allow_headers(AnyCors)
}

/// Converts a handler panic into the generic 500 body.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let error = InterfaceError::internal(message, new_correlation_id());
    tracing::error!(
        event_name = "api.internal_error",
        correlation_id = error.correlation_id(),
        error = %error,
        "request handler panicked"
    );
    let body = Json(ErrorBody { detail: error.detail() });
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "AI 점심 메뉴 추천 API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: IndexEndpoints {
            weather: "/api/weather?location={location}",
            recommend: "/api/recommend (POST)",
            cafeteria: "/api/cafeteria/recommend (POST)",
            recipe: "/api/recipe (POST)",
            health: "/health",
        },
    })
}

pub async fn weather(
    State(state): State<ApiState>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let query = WeatherQuery::named(params.location.unwrap_or_default());
    let correlation_id = new_correlation_id();
    let span = info_span!("api.weather", correlation_id = %correlation_id);

    let reading = reading_or_placeholder(state.weather.as_ref(), &query).instrument(span).await;
    Ok(ApiResponse::ok(reading))
}

pub async fn recommend(
    State(state): State<ApiState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let correlation_id = new_correlation_id();
    let span = info_span!("api.recommend", correlation_id = %correlation_id);

    let moods = body.moods.unwrap_or_default();
    let preferences = Preferences::new(body.food_type, body.mood, body.num_people, moods);
    let query = WeatherQuery::named(body.location);

    let recommendation = async {
        let weather = reading_or_placeholder(state.weather.as_ref(), &query).await;
        info!(
            event_name = "api.recommend.weather_resolved",
            location = %weather.location,
            temperature = weather.temperature,
            food_type = preferences.food_type.label(),
            mood = preferences.mood.label(),
            "recommending menu"
        );
        state.recommendations.recommend(&weather, &preferences).await
    }
    .instrument(span)
    .await;

    Ok(ApiResponse::ok(recommendation))
}

pub async fn recommend_from_cafeteria(
    State(state): State<ApiState>,
    body: Result<Json<CafeteriaRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let correlation_id = new_correlation_id();
    if body.cafeteria_menu.trim().is_empty() {
        return Err(ApiError::bad_request("cafeteria_menu must not be blank", &correlation_id));
    }
    let span = info_span!("api.cafeteria_recommend", correlation_id = %correlation_id);

    let query = WeatherQuery::named(body.location.clone()).with_coordinates(body.coordinates());
    let cafeteria_menu = body.cafeteria_menu.trim();

    let recommendation = async {
        let weather = reading_or_placeholder(state.weather.as_ref(), &query).await;
        state.recommendations.recommend_from_cafeteria(&weather, cafeteria_menu).await
    }
    .instrument(span)
    .await;

    Ok(ApiResponse::ok(recommendation))
}

pub async fn recipe(
    State(state): State<ApiState>,
    body: Result<Json<RecipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let correlation_id = new_correlation_id();
    let menu_name = body.menu_name.trim();
    if menu_name.is_empty() {
        return Err(ApiError::bad_request("menu_name must not be blank", &correlation_id));
    }
    let span = info_span!("api.recipe", correlation_id = %correlation_id);

    let recipe = state.recipes.recipe(menu_name, body.num_servings).instrument(span).await;
    Ok(ApiResponse::ok(recipe))
}
