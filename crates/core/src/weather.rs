//! Weather lookup seam and the static location table it resolves names with.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::weather::WeatherReading;
use crate::errors::WeatherError;

pub const DEFAULT_LOCATION: &str = "서울";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy)]
struct LocationSeed {
    name: &'static str,
    latitude: f64,
    longitude: f64,
}

const KNOWN_LOCATIONS: &[LocationSeed] = &[
    LocationSeed { name: "서울", latitude: 37.5665, longitude: 126.9780 },
    LocationSeed { name: "강남", latitude: 37.4979, longitude: 127.0276 },
    LocationSeed { name: "여의도", latitude: 37.5219, longitude: 126.9245 },
    LocationSeed { name: "판교", latitude: 37.3944, longitude: 127.1109 },
    LocationSeed { name: "부산", latitude: 35.1796, longitude: 129.0756 },
    LocationSeed { name: "대구", latitude: 35.8714, longitude: 128.6014 },
    LocationSeed { name: "인천", latitude: 37.4563, longitude: 126.7052 },
    LocationSeed { name: "광주", latitude: 35.1595, longitude: 126.8526 },
    LocationSeed { name: "대전", latitude: 36.3504, longitude: 127.3845 },
    LocationSeed { name: "울산", latitude: 35.5384, longitude: 129.3114 },
    LocationSeed { name: "세종", latitude: 36.4800, longitude: 127.2890 },
    LocationSeed { name: "수원", latitude: 37.2636, longitude: 127.0286 },
    LocationSeed { name: "창원", latitude: 35.2272, longitude: 128.6811 },
    LocationSeed { name: "고양", latitude: 37.6584, longitude: 126.8320 },
    LocationSeed { name: "용인", latitude: 37.2411, longitude: 127.1776 },
];

/// Coordinates for a known city name; anything else resolves to Seoul.
pub fn coordinates_for(location: &str) -> Coordinates {
    let name = location.trim();
    KNOWN_LOCATIONS
        .iter()
        .find(|seed| seed.name == name)
        .or_else(|| KNOWN_LOCATIONS.first())
        .map(|seed| Coordinates { latitude: seed.latitude, longitude: seed.longitude })
        .unwrap_or(Coordinates { latitude: 37.5665, longitude: 126.9780 })
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeatherQuery {
    pub location: String,
    pub coordinates: Option<Coordinates>,
}

impl WeatherQuery {
    pub fn named(location: impl Into<String>) -> Self {
        let location = location.into();
        let location = if location.trim().is_empty() {
            DEFAULT_LOCATION.to_string()
        } else {
            location.trim().to_string()
        };
        Self { location, coordinates: None }
    }

    pub fn with_coordinates(mut self, coordinates: Option<Coordinates>) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// Explicit coordinates win over the name table.
    pub fn resolved_coordinates(&self) -> Coordinates {
        self.coordinates.unwrap_or_else(|| coordinates_for(&self.location))
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError>;
}
