use serde::{Serialize, Serializer};

/// Sky condition decoded from a WMO weather code.
///
/// Labels are the Korean strings the frontend renders; see
/// <https://open-meteo.com/en/docs> for the code table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SkyCondition {
    #[default]
    Clear,
    MostlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    DenseFog,
    LightDrizzle,
    Drizzle,
    HeavyDrizzle,
    LightFreezingDrizzle,
    HeavyFreezingDrizzle,
    LightRain,
    Rain,
    HeavyRain,
    LightFreezingRain,
    HeavyFreezingRain,
    LightSnow,
    Snow,
    HeavySnow,
    Sleet,
    LightShowers,
    Showers,
    HeavyShowers,
    LightSnowShowers,
    HeavySnowShowers,
    Thunderstorm,
    ThunderstormLightHail,
    ThunderstormHeavyHail,
}

impl SkyCondition {
    pub fn from_wmo_code(code: u16) -> Self {
        match code {
            0 => Self::Clear,
            1 => Self::MostlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 => Self::Fog,
            48 => Self::DenseFog,
            51 => Self::LightDrizzle,
            53 => Self::Drizzle,
            55 => Self::HeavyDrizzle,
            56 => Self::LightFreezingDrizzle,
            57 => Self::HeavyFreezingDrizzle,
            61 => Self::LightRain,
            63 => Self::Rain,
            65 => Self::HeavyRain,
            66 => Self::LightFreezingRain,
            67 => Self::HeavyFreezingRain,
            71 => Self::LightSnow,
            73 => Self::Snow,
            75 => Self::HeavySnow,
            77 => Self::Sleet,
            80 => Self::LightShowers,
            81 => Self::Showers,
            82 => Self::HeavyShowers,
            85 => Self::LightSnowShowers,
            86 => Self::HeavySnowShowers,
            95 => Self::Thunderstorm,
            96 => Self::ThunderstormLightHail,
            99 => Self::ThunderstormHeavyHail,
            _ => Self::Clear,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "맑음",
            Self::MostlyClear => "대체로 맑음",
            Self::PartlyCloudy => "구름조금",
            Self::Overcast => "구름많음",
            Self::Fog => "안개",
            Self::DenseFog => "짙은 안개",
            Self::LightDrizzle => "가랑비",
            Self::Drizzle => "보통 가랑비",
            Self::HeavyDrizzle => "강한 가랑비",
            Self::LightFreezingDrizzle => "약한 어는 가랑비",
            Self::HeavyFreezingDrizzle => "강한 어는 가랑비",
            Self::LightRain => "약한 비",
            Self::Rain => "비",
            Self::HeavyRain => "강한 비",
            Self::LightFreezingRain => "약한 어는 비",
            Self::HeavyFreezingRain => "강한 어는 비",
            Self::LightSnow | Self::LightSnowShowers => "약한 눈",
            Self::Snow => "눈",
            Self::HeavySnow | Self::HeavySnowShowers => "강한 눈",
            Self::Sleet => "진눈깨비",
            Self::LightShowers => "약한 소나기",
            Self::Showers => "소나기",
            Self::HeavyShowers => "강한 소나기",
            Self::Thunderstorm => "뇌우",
            Self::ThunderstormLightHail => "약한 우박을 동반한 뇌우",
            Self::ThunderstormHeavyHail => "강한 우박을 동반한 뇌우",
        }
    }

    pub fn is_snow(&self) -> bool {
        matches!(
            self,
            Self::LightSnow
                | Self::Snow
                | Self::HeavySnow
                | Self::Sleet
                | Self::LightSnowShowers
                | Self::HeavySnowShowers
        )
    }
}

impl std::fmt::Display for SkyCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SkyCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Precipitation {
    Present,
    #[default]
    Absent,
}

impl Precipitation {
    pub fn from_millimetres(amount: f64) -> Self {
        if amount > 0.0 {
            Self::Present
        } else {
            Self::Absent
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Present => "있음",
            Self::Absent => "없음",
        }
    }
}

impl Serialize for Precipitation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Normalized weather snapshot for a single request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeatherReading {
    pub location: String,
    pub temperature: i32,
    pub sky_condition: SkyCondition,
    pub precipitation: Precipitation,
    pub humidity: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WeatherReading {
    /// Reading substituted when the weather provider cannot be reached.
    pub fn placeholder(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            temperature: 15,
            sky_condition: SkyCondition::Clear,
            precipitation: Precipitation::Absent,
            humidity: 60,
            cloud_cover: Some(20),
            wind_speed: Some(3.5),
            weather_code: Some(0),
            note: Some("날씨 서비스에 연결하지 못해 기본 날씨 정보를 사용합니다.".to_string()),
        }
    }

    pub fn summary(&self) -> String {
        format!("{}°C, {}", self.temperature, self.sky_condition)
    }

    pub fn info(&self) -> WeatherInfo {
        WeatherInfo {
            location: self.location.clone(),
            temperature: self.temperature,
            condition: self.sky_condition,
            precipitation: self.precipitation,
        }
    }
}

/// Weather block echoed into every recommendation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeatherInfo {
    pub location: String,
    pub temperature: i32,
    pub condition: SkyCondition,
    pub precipitation: Precipitation,
}

#[cfg(test)]
mod tests {
    use super::{Precipitation, SkyCondition, WeatherReading};

    #[test]
    fn wmo_codes_decode_to_labels() {
        assert_eq!(SkyCondition::from_wmo_code(0).label(), "맑음");
        assert_eq!(SkyCondition::from_wmo_code(3).label(), "구름많음");
        assert_eq!(SkyCondition::from_wmo_code(63).label(), "비");
        assert_eq!(SkyCondition::from_wmo_code(86).label(), "강한 눈");
        assert_eq!(SkyCondition::from_wmo_code(99).label(), "강한 우박을 동반한 뇌우");
    }

    #[test]
    fn unknown_codes_decode_to_clear() {
        assert_eq!(SkyCondition::from_wmo_code(4), SkyCondition::Clear);
        assert_eq!(SkyCondition::from_wmo_code(1000), SkyCondition::Clear);
    }

    #[test]
    fn snow_family_is_flagged() {
        assert!(SkyCondition::from_wmo_code(73).is_snow());
        assert!(SkyCondition::from_wmo_code(77).is_snow());
        assert!(!SkyCondition::from_wmo_code(63).is_snow());
    }

    #[test]
    fn precipitation_is_present_only_for_positive_amounts() {
        assert_eq!(Precipitation::from_millimetres(0.0), Precipitation::Absent);
        assert_eq!(Precipitation::from_millimetres(0.2), Precipitation::Present);
    }

    #[test]
    fn reading_serializes_korean_labels_and_skips_empty_fields() {
        let reading = WeatherReading {
            location: "부산".to_string(),
            temperature: 22,
            sky_condition: SkyCondition::PartlyCloudy,
            precipitation: Precipitation::Absent,
            humidity: 55,
            cloud_cover: None,
            wind_speed: None,
            weather_code: Some(2),
            note: None,
        };

        let value = serde_json::to_value(&reading).expect("serialize reading");
        assert_eq!(value["sky_condition"], "구름조금");
        assert_eq!(value["precipitation"], "없음");
        assert_eq!(value["weather_code"], 2);
        assert!(value.get("cloud_cover").is_none());
        assert!(value.get("note").is_none());
    }

    #[test]
    fn placeholder_matches_documented_defaults() {
        let reading = WeatherReading::placeholder("광주");
        assert_eq!(reading.location, "광주");
        assert_eq!(reading.temperature, 15);
        assert_eq!(reading.sky_condition, SkyCondition::Clear);
        assert_eq!(reading.precipitation, Precipitation::Absent);
        assert!(reading.note.is_some());
        assert_eq!(reading.summary(), "15°C, 맑음");
    }
}
