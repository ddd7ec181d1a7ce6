use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::weather::WeatherInfo;

/// Single-menu recommendation returned by `/api/recommend`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MenuRecommendation {
    pub menu: String,
    pub category: String,
    pub reason: String,
    pub temperature_match: String,
    pub alternatives: Vec<String>,
    pub weather_info: WeatherInfo,
}

/// Fixed slot tags of a cafeteria-anchored recommendation, in response order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotType {
    Upgrade,
    SimilarCategory,
    WeatherBased,
}

impl SlotType {
    pub const ORDER: [SlotType; 3] = [Self::Upgrade, Self::SimilarCategory, Self::WeatherBased];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upgrade => "상위호환",
            Self::SimilarCategory => "비슷한카테고리",
            Self::WeatherBased => "날씨기반",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "상위호환" | "upgrade" => Some(Self::Upgrade),
            "비슷한카테고리" | "similar-category" => Some(Self::SimilarCategory),
            "날씨기반" | "weather-based" => Some(Self::WeatherBased),
            _ => None,
        }
    }
}

impl Serialize for SlotType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SlotType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            de::Error::unknown_variant(
                &raw,
                &[
                    "상위호환",
                    "비슷한카테고리",
                    "날씨기반",
                    "upgrade",
                    "similar-category",
                    "weather-based",
                ],
            )
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CafeteriaSlot {
    #[serde(rename = "type")]
    pub kind: SlotType,
    pub menu: String,
    pub category: String,
    pub reason: String,
    pub price_range: String,
}

/// Three outside options for a day the cafeteria menu does not appeal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CafeteriaRecommendation {
    pub cafeteria_menu: String,
    pub recommendations: Vec<CafeteriaSlot>,
    pub weather_summary: String,
    pub weather_info: WeatherInfo,
}
