pub mod fallback;
pub mod knowledge;

pub use fallback::RuleBasedRecommender;
pub use knowledge::{MenuCandidate, Spiciness, TemperatureBand};
