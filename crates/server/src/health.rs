use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    advisor: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub advisor: &'static str,
    pub checked_at: String,
}

pub fn router(advisor: &'static str) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { advisor })
}

/// Liveness only: the service answers even when both upstreams are down.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "healthy",
        advisor: state.advisor,
        checked_at: Utc::now().to_rfc3339(),
    };
    (StatusCode::OK, Json(payload))
}
