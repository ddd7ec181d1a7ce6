//! Open-Meteo backed weather lookups.

use std::time::Duration;

use async_trait::async_trait;
use lunchmate_core::config::WeatherConfig;
use lunchmate_core::domain::weather::{Precipitation, SkyCondition, WeatherReading};
use lunchmate_core::errors::WeatherError;
use lunchmate_core::weather::{WeatherProvider, WeatherQuery};
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,weather_code,precipitation,cloud_cover,wind_speed_10m";

pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoClient {
    pub fn new(
        base_url: impl Into<String>,
        timezone: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| WeatherError::Transport(error.to_string()))?;

        Ok(Self { client, base_url: base_url.into(), timezone: timezone.into() })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::new(
            config.base_url.clone(),
            config.timezone.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    #[serde(default)]
    relative_humidity_2m: Option<f64>,
    #[serde(default)]
    weather_code: Option<u16>,
    #[serde(default)]
    precipitation: Option<f64>,
    #[serde(default)]
    cloud_cover: Option<f64>,
    #[serde(default)]
    wind_speed_10m: Option<f64>,
}

fn percentage(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

impl CurrentConditions {
    fn into_reading(self, location: &str) -> WeatherReading {
        let code = self.weather_code.unwrap_or(0);
        WeatherReading {
            location: location.to_string(),
            temperature: self.temperature_2m.round() as i32,
            sky_condition: SkyCondition::from_wmo_code(code),
            precipitation: Precipitation::from_millimetres(self.precipitation.unwrap_or(0.0)),
            humidity: self.relative_humidity_2m.map(percentage).unwrap_or(0),
            cloud_cover: self.cloud_cover.map(percentage),
            wind_speed: self.wind_speed_10m,
            weather_code: Some(code),
            note: None,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        let coordinates = query.resolved_coordinates();
        let url = format!("{}/v1/forecast", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", self.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|error| WeatherError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let forecast: ForecastResponse =
            response.json().await.map_err(|error| WeatherError::Decode(error.to_string()))?;

        Ok(forecast.current.into_reading(&query.location))
    }
}

/// Current weather for `query`, or the placeholder reading when the provider
/// cannot answer.
pub async fn reading_or_placeholder(
    provider: &dyn WeatherProvider,
    query: &WeatherQuery,
) -> WeatherReading {
    match provider.current(query).await {
        Ok(reading) => reading,
        Err(error) => {
            warn!(
                event_name = "weather.placeholder",
                location = %query.location,
                error = %error,
                "weather lookup failed, using placeholder reading"
            );
            WeatherReading::placeholder(query.location.clone())
        }
    }
}
