pub mod config;
pub mod domain;
pub mod errors;
pub mod menu;
pub mod weather;

pub use config::{AdvisorProvider, AppConfig, ConfigError, LoadOptions, LogFormat};
pub use domain::preferences::{Category, FoodType, Mood, Preferences};
pub use domain::recipe::{Ingredient, Recipe};
pub use domain::recommendation::{
    CafeteriaRecommendation, CafeteriaSlot, MenuRecommendation, SlotType,
};
pub use domain::weather::{Precipitation, SkyCondition, WeatherInfo, WeatherReading};
pub use errors::{InterfaceError, WeatherError};
pub use menu::RuleBasedRecommender;
pub use weather::{Coordinates, WeatherProvider, WeatherQuery, DEFAULT_LOCATION};
