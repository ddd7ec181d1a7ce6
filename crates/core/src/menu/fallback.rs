//! Rule-based recommender used whenever the generative advisor is
//! unavailable or its output cannot be trusted.
//!
//! Every operation here is total: missing or unknown inputs fall back to
//! defaults rather than erroring.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::domain::preferences::Preferences;
use crate::domain::recipe::{Ingredient, Recipe};
use crate::domain::recommendation::{
    CafeteriaRecommendation, CafeteriaSlot, MenuRecommendation, SlotType,
};
use crate::domain::weather::WeatherReading;

use super::knowledge::{
    collect_candidates, mood_categories, MenuCandidate, TemperatureBand, DEFAULT_CANDIDATE,
    FALLBACK_ALTERNATIVES,
};

const MAX_ALTERNATIVES: usize = 3;

#[derive(Debug, Clone, Copy)]
struct IngredientSeed {
    name: &'static str,
    quantity: u32,
    unit: &'static str,
}

const RECIPE_TEMPLATE: &[IngredientSeed] = &[
    IngredientSeed { name: "주재료", quantity: 200, unit: "g" },
    IngredientSeed { name: "양파", quantity: 1, unit: "개" },
    IngredientSeed { name: "마늘", quantity: 3, unit: "쪽" },
    IngredientSeed { name: "간장", quantity: 2, unit: "큰술" },
    IngredientSeed { name: "식용유", quantity: 1, unit: "큰술" },
];

const RECIPE_STEPS: &[&str] = &[
    "재료를 깨끗이 씻어 준비합니다.",
    "양파와 마늘을 먹기 좋은 크기로 썹니다.",
    "달군 팬에 식용유를 두르고 마늘을 볶아 향을 냅니다.",
    "주재료를 넣고 중불에서 고루 익힙니다.",
    "간장으로 간을 맞춰 마무리합니다.",
];

/// Band the dish pool is drawn from: rain or snow always calls for warm food.
pub fn selection_band(weather: &WeatherReading) -> TemperatureBand {
    if weather.precipitation.is_present() {
        TemperatureBand::Warm
    } else {
        TemperatureBand::from_temperature(weather.temperature)
    }
}

/// Human-readable explanation of how the weather shaped the pick.
pub fn temperature_match(weather: &WeatherReading) -> String {
    let temperature = weather.temperature;
    let mut text = match TemperatureBand::from_temperature(temperature) {
        TemperatureBand::Warm => {
            format!("쌀쌀한 날씨({temperature}°C)에 따뜻한 음식으로 몸을 녹이세요")
        }
        TemperatureBand::Cool => {
            format!("더운 날씨({temperature}°C)에 시원한 음식으로 더위를 식히세요")
        }
        TemperatureBand::Mid => format!("적당한 날씨({temperature}°C)에 어떤 메뉴든 좋습니다"),
    };

    if weather.precipitation.is_present() {
        let falling = if weather.sky_condition.is_snow() { "눈이" } else { "비가" };
        text.push_str(&format!(". {falling} 내리니 따뜻한 국물 요리가 제격입니다"));
    }

    text
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleBasedRecommender;

impl RuleBasedRecommender {
    pub fn new() -> Self {
        Self
    }

    /// Picks a menu with a freshly seeded random source for this call.
    pub fn recommend(
        &self,
        weather: &WeatherReading,
        preferences: &Preferences,
    ) -> MenuRecommendation {
        let mut rng = StdRng::from_entropy();
        self.recommend_with_rng(weather, preferences, &mut rng)
    }

    pub fn recommend_with_rng<R: Rng + ?Sized>(
        &self,
        weather: &WeatherReading,
        preferences: &Preferences,
        rng: &mut R,
    ) -> MenuRecommendation {
        let candidates = self.candidates(weather, preferences);
        let selected = candidates.choose(rng).copied().unwrap_or(DEFAULT_CANDIDATE);

        MenuRecommendation {
            menu: selected.name.to_string(),
            category: selected.category.label().to_string(),
            reason: selected.reason.to_string(),
            temperature_match: temperature_match(weather),
            alternatives: alternatives(&candidates, selected.name),
            weather_info: weather.info(),
        }
    }

    /// Final candidate pool after band, category and mood filtering.
    pub fn candidates(
        &self,
        weather: &WeatherReading,
        preferences: &Preferences,
    ) -> Vec<MenuCandidate> {
        let band = selection_band(weather);
        let candidates = collect_candidates(preferences.food_type.categories(), band);

        let preferred = mood_categories(preferences.mood);
        if preferred.is_empty() {
            return candidates;
        }

        let filtered: Vec<MenuCandidate> = candidates
            .iter()
            .copied()
            .filter(|candidate| preferred.contains(&candidate.category))
            .collect();
        if filtered.is_empty() {
            candidates
        } else {
            filtered
        }
    }

    /// Deterministic three-slot recommendation; the cafeteria text is echoed,
    /// not analysed.
    pub fn recommend_from_cafeteria(
        &self,
        weather: &WeatherReading,
        cafeteria_menu: &str,
    ) -> CafeteriaRecommendation {
        let hot = weather.temperature > 25;
        let weather_slot = CafeteriaSlot {
            kind: SlotType::WeatherBased,
            menu: if hot { "냉면" } else { "칼국수" }.to_string(),
            category: "한식".to_string(),
            reason: format!("{} 날씨에 어울리는 메뉴", if hot { "더운" } else { "쌀쌀한" }),
            price_range: "8,000-12,000원".to_string(),
        };

        CafeteriaRecommendation {
            cafeteria_menu: cafeteria_menu.to_string(),
            recommendations: vec![
                CafeteriaSlot {
                    kind: SlotType::Upgrade,
                    menu: "프리미엄 한정식".to_string(),
                    category: "한식".to_string(),
                    reason: "구내식당보다 고급스러운 한식 코스".to_string(),
                    price_range: "15,000-20,000원".to_string(),
                },
                CafeteriaSlot {
                    kind: SlotType::SimilarCategory,
                    menu: "김치찌개".to_string(),
                    category: "한식".to_string(),
                    reason: "구수하고 든든한 한식".to_string(),
                    price_range: "8,000-10,000원".to_string(),
                },
                weather_slot,
            ],
            weather_summary: weather.summary(),
            weather_info: weather.info(),
        }
    }

    /// Generic recipe scaled linearly by `servings` (0 is treated as 1).
    pub fn recipe(&self, menu_name: &str, servings: u32) -> Recipe {
        let servings = servings.max(1);
        Recipe {
            menu_name: menu_name.to_string(),
            servings,
            ingredients: RECIPE_TEMPLATE
                .iter()
                .map(|seed| Ingredient {
                    name: seed.name.to_string(),
                    amount: format!(
                        "{}{}",
                        u64::from(seed.quantity) * u64::from(servings),
                        seed.unit
                    ),
                })
                .collect(),
            steps: RECIPE_STEPS.iter().map(|step| step.to_string()).collect(),
            cooking_time: "약 30분".to_string(),
            difficulty: "보통".to_string(),
            note: Some("AI 추천이 연결되면 메뉴에 맞춘 상세 레시피를 제공합니다.".to_string()),
        }
    }
}

fn alternatives(candidates: &[MenuCandidate], selected: &str) -> Vec<String> {
    let mut picked: Vec<String> = Vec::with_capacity(MAX_ALTERNATIVES);
    let pool = candidates.iter().map(|candidate| candidate.name).chain(FALLBACK_ALTERNATIVES);

    for name in pool {
        if picked.len() == MAX_ALTERNATIVES {
            break;
        }
        if name != selected && !picked.iter().any(|existing| existing == name) {
            picked.push(name.to_string());
        }
    }

    picked
}
