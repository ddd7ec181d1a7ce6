//! Structural checks applied to advisor output before it reaches a caller.
//!
//! The advisor only ever proposes text. Anything it returns is parsed into a
//! typed payload and rejected unless every field the response needs is present;
//! fields that can be derived from the local weather reading are overwritten.

use std::collections::HashSet;

use lunchmate_core::domain::recipe::{Ingredient, Recipe};
use lunchmate_core::domain::recommendation::{
    CafeteriaRecommendation, CafeteriaSlot, MenuRecommendation, SlotType,
};
use lunchmate_core::domain::weather::WeatherReading;
use lunchmate_core::menu::fallback::temperature_match;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::advisor::AdvisorError;

const MAX_ALTERNATIVES: usize = 3;
const UNKNOWN_DETAIL: &str = "정보 없음";

/// Returns the body of the first fenced block, preferring a `json` fence.
pub fn strip_code_fence(raw: &str) -> &str {
    for fence in ["```json", "```"] {
        if let Some((_, rest)) = raw.split_once(fence) {
            let body = rest.split_once("```").map_or(rest, |(body, _)| body);
            return body.trim();
        }
    }
    raw.trim()
}

fn parse_payload<T: DeserializeOwned>(raw: &str) -> Result<T, AdvisorError> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|error| AdvisorError::Malformed(error.to_string()))
}

fn required(field: &'static str, value: Option<String>) -> Result<String, AdvisorError> {
    match value.map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AdvisorError::SchemaViolation {
            reason_code: "missing_field",
            detail: format!("`{field}` is missing or blank"),
        }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn or_unknown(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| UNKNOWN_DETAIL.to_string())
}

#[derive(Debug, Default, Deserialize)]
struct MenuPayload {
    menu: Option<String>,
    category: Option<String>,
    reason: Option<String>,
    temperature_match: Option<String>,
    alternatives: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct CafeteriaPayload {
    recommendations: Option<Vec<SlotPayload>>,
    weather_summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SlotPayload {
    #[serde(rename = "type")]
    kind: Option<String>,
    menu: Option<String>,
    category: Option<String>,
    reason: Option<String>,
    price_range: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RecipePayload {
    menu_name: Option<String>,
    ingredients: Option<Vec<Ingredient>>,
    steps: Option<Vec<String>>,
    cooking_time: Option<String>,
    difficulty: Option<String>,
    note: Option<String>,
}

pub fn accept_menu(
    raw: &str,
    weather: &WeatherReading,
) -> Result<MenuRecommendation, AdvisorError> {
    let payload: MenuPayload = parse_payload(raw)?;

    let menu = required("menu", payload.menu)?;
    let category = required("category", payload.category)?;
    let reason = required("reason", payload.reason)?;

    let mut seen = HashSet::new();
    let alternatives = payload
        .alternatives
        .unwrap_or_default()
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && *name != menu)
        .filter(|name| seen.insert(name.clone()))
        .take(MAX_ALTERNATIVES)
        .collect();

    Ok(MenuRecommendation {
        temperature_match: non_blank(payload.temperature_match)
            .unwrap_or_else(|| temperature_match(weather)),
        menu,
        category,
        reason,
        alternatives,
        weather_info: weather.info(),
    })
}

pub fn accept_cafeteria(
    raw: &str,
    weather: &WeatherReading,
    cafeteria_menu: &str,
) -> Result<CafeteriaRecommendation, AdvisorError> {
    let payload: CafeteriaPayload = parse_payload(raw)?;
    let slots = payload.recommendations.unwrap_or_default();

    if slots.len() != SlotType::ORDER.len() {
        return Err(AdvisorError::SchemaViolation {
            reason_code: "slot_count",
            detail: format!("expected 3 recommendations, got {}", slots.len()),
        });
    }

    let mut recommendations = Vec::with_capacity(slots.len());
    for (slot, expected) in slots.into_iter().zip(SlotType::ORDER) {
        let kind = slot.kind.as_deref().and_then(SlotType::parse);
        if kind != Some(expected) {
            return Err(AdvisorError::SchemaViolation {
                reason_code: "slot_order",
                detail: format!(
                    "expected slot `{}`, got `{}`",
                    expected.label(),
                    slot.kind.unwrap_or_default()
                ),
            });
        }

        recommendations.push(CafeteriaSlot {
            kind: expected,
            menu: required("menu", slot.menu)?,
            category: required("category", slot.category)?,
            reason: required("reason", slot.reason)?,
            price_range: required("price_range", slot.price_range)?,
        });
    }

    Ok(CafeteriaRecommendation {
        cafeteria_menu: cafeteria_menu.to_string(),
        recommendations,
        weather_summary: non_blank(payload.weather_summary).unwrap_or_else(|| weather.summary()),
        weather_info: weather.info(),
    })
}

pub fn accept_recipe(raw: &str, servings: u32) -> Result<Recipe, AdvisorError> {
    let payload: RecipePayload = parse_payload(raw)?;

    let menu_name = required("menu_name", payload.menu_name)?;
    let ingredients: Vec<Ingredient> = payload
        .ingredients
        .unwrap_or_default()
        .into_iter()
        .filter(|ingredient| !ingredient.name.trim().is_empty())
        .collect();
    let steps: Vec<String> = payload
        .steps
        .unwrap_or_default()
        .into_iter()
        .map(|step| step.trim().to_string())
        .filter(|step| !step.is_empty())
        .collect();

    if ingredients.is_empty() || steps.is_empty() {
        return Err(AdvisorError::SchemaViolation {
            reason_code: "empty_recipe",
            detail: "recipe needs at least one ingredient and one step".to_string(),
        });
    }

    Ok(Recipe {
        menu_name,
        servings,
        ingredients,
        steps,
        cooking_time: or_unknown(payload.cooking_time),
        difficulty: or_unknown(payload.difficulty),
        note: non_blank(payload.note),
    })
}

#[cfg(test)]
mod tests {
    use lunchmate_core::domain::recommendation::SlotType;
    use lunchmate_core::domain::weather::{Precipitation, WeatherReading};

    use super::{accept_cafeteria, accept_menu, accept_recipe, strip_code_fence};
    use crate::advisor::AdvisorError;

    fn reason_code(result: Result<impl std::fmt::Debug, AdvisorError>) -> &'static str {
        match result {
            Ok(value) => panic!("expected rejection, got {value:?}"),
            Err(error) => error.reason_code(),
        }
    }

    #[test]
    fn json_fence_is_preferred_over_bare_fence() {
        let raw = "Sure!\n```json\n{\"menu\": \"라멘\"}\n```\ntrailing ``` noise";
        assert_eq!(strip_code_fence(raw), "{\"menu\": \"라멘\"}");
    }

    #[test]
    fn bare_fence_and_unfenced_text_are_handled() {
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn menu_output_is_normalized() {
        let weather = WeatherReading::placeholder("서울");
        let raw = r#"```json
{
  "menu": " 라멘 ",
  "category": "일식",
  "reason": "진한 국물",
  "temperature_match": "",
  "alternatives": ["라멘", "우동", "우동", " ", "초밥", "돈카츠", "소바"]
}
```"#;

        let recommendation = accept_menu(raw, &weather).expect("valid menu payload");

        assert_eq!(recommendation.menu, "라멘");
        assert_eq!(recommendation.alternatives, vec!["우동", "초밥", "돈카츠"]);
        assert!(recommendation.temperature_match.contains("15°C"));
        assert_eq!(recommendation.weather_info, weather.info());
    }

    #[test]
    fn menu_without_reason_is_rejected() {
        let weather = WeatherReading::placeholder("서울");
        let raw = r#"{"menu": "라멘", "category": "일식", "reason": "  "}"#;
        assert_eq!(reason_code(accept_menu(raw, &weather)), "missing_field");
    }

    #[test]
    fn prose_output_is_malformed() {
        let weather = WeatherReading::placeholder("서울");
        let result = accept_menu("오늘은 라멘을 추천합니다!", &weather);
        assert!(matches!(result, Err(AdvisorError::Malformed(_))));
    }

    fn slot(kind: &str) -> String {
        format!(
            r#"{{"type": "{kind}", "menu": "메뉴", "category": "한식", "reason": "이유", "price_range": "10,000원"}}"#
        )
    }

    #[test]
    fn cafeteria_output_keeps_slot_order_and_caller_menu() {
        let mut weather = WeatherReading::placeholder("강남");
        weather.precipitation = Precipitation::Present;
        let raw = format!(
            r#"{{"cafeteria_menu": "다른 메뉴", "recommendations": [{}, {}, {}], "weather_summary": " "}}"#,
            slot("상위호환"),
            slot("similar-category"),
            slot("날씨기반")
        );

        let recommendation =
            accept_cafeteria(&raw, &weather, "돈까스 정식").expect("valid cafeteria payload");

        assert_eq!(recommendation.cafeteria_menu, "돈까스 정식");
        let kinds: Vec<SlotType> = recommendation.recommendations.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, SlotType::ORDER.to_vec());
        assert_eq!(recommendation.weather_summary, "15°C, 맑음");
        assert_eq!(recommendation.weather_info, weather.info());
    }

    #[test]
    fn cafeteria_output_with_wrong_shape_is_rejected() {
        let weather = WeatherReading::placeholder("강남");

        let two = format!(r#"{{"recommendations": [{}, {}]}}"#, slot("상위호환"), slot("날씨기반"));
        assert_eq!(reason_code(accept_cafeteria(&two, &weather, "비빔밥")), "slot_count");

        let swapped = format!(
            r#"{{"recommendations": [{}, {}, {}]}}"#,
            slot("비슷한카테고리"),
            slot("상위호환"),
            slot("날씨기반")
        );
        assert_eq!(reason_code(accept_cafeteria(&swapped, &weather, "비빔밥")), "slot_order");
    }

    #[test]
    fn recipe_servings_come_from_the_request() {
        let raw = r#"{
            "menu_name": "김치볶음밥",
            "servings": 9,
            "ingredients": [{"name": "김치", "amount": "1컵"}, {"name": "", "amount": "x"}],
            "steps": ["김치를 볶는다", "", "밥을 넣는다"],
            "difficulty": "쉬움"
        }"#;

        let recipe = accept_recipe(raw, 2).expect("valid recipe payload");

        assert_eq!(recipe.servings, 2);
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.steps, vec!["김치를 볶는다", "밥을 넣는다"]);
        assert_eq!(recipe.cooking_time, "정보 없음");
        assert_eq!(recipe.difficulty, "쉬움");
    }

    #[test]
    fn recipe_without_steps_is_rejected() {
        let raw = r#"{"menu_name": "김밥", "ingredients": [{"name": "김", "amount": "1장"}]}"#;
        assert_eq!(reason_code(accept_recipe(raw, 1)), "empty_recipe");
    }
}
