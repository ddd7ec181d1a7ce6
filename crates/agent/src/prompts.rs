//! Prompt rendering for the generative advisor.
//!
//! Templates are registered under `.txt` names so Tera leaves the text
//! unescaped.

use lunchmate_core::domain::preferences::Preferences;
use lunchmate_core::domain::weather::WeatherReading;
use tera::{Context, Tera};

const LUNCH_TEMPLATE: &str = "lunch.txt";
const CAFETERIA_TEMPLATE: &str = "cafeteria.txt";
const RECIPE_TEMPLATE: &str = "recipe.txt";

const LUNCH_SOURCE: &str = r#"현재 날씨 정보:
- 위치: {{ location }}
- 기온: {{ temperature }}°C
- 날씨: {{ condition }}
- 강수: {{ precipitation }}

사용자 정보:
- 인원: {{ num_people }}명
- 음식 종류: {{ food_type }}
- 기분: {{ mood }}
{%- if moods | length > 1 %}
- 각 사람의 기분: {{ moods | join(sep=", ") }}
{%- endif %}

위 정보를 바탕으로 직장인에게 적합한 점심 메뉴를 추천해주세요.
날씨가 추우면 따뜻한 음식, 더우면 시원한 음식을 추천하고,
비가 오면 국물 요리를, 맑은 날은 다양한 선택지를 제안해주세요.
기분 상태도 고려해서 추천해주세요.

반드시 아래 JSON 형식으로만 응답해주세요:
{
    "menu": "메뉴명",
    "category": "음식 카테고리 (한식/중식/일식/양식/분식)",
    "reason": "추천 이유 (50자 이내)",
    "temperature_match": "날씨와 메뉴가 어울리는 이유",
    "alternatives": ["대안 메뉴", "대안 메뉴", "대안 메뉴"]
}
"#;

const CAFETERIA_SOURCE: &str = r#"당신은 구내식당을 이용하는 직장인을 위한 메뉴 추천 전문가입니다.

오늘 구내식당 메뉴: {{ cafeteria_menu }}

현재 날씨 정보:
- 위치: {{ location }}
- 기온: {{ temperature }}°C
- 날씨: {{ condition }}
- 강수: {{ precipitation }}

구내식당에서 먹기 싫은 날을 위해, 다음 3가지 카테고리로 외부 메뉴를 추천해주세요:

1. 상위호환 메뉴: 구내식당 메뉴의 고급 버전 또는 더 맛있는 버전
2. 비슷한 카테고리: 같은 계열이지만 다른 음식
3. 날씨 기반 예외 메뉴: 현재 날씨에 어울리지만 완전히 다른 종류의 음식

반드시 아래 JSON 형식으로만 응답해주세요:
{
    "cafeteria_menu": "{{ cafeteria_menu }}",
    "recommendations": [
        {
            "type": "상위호환",
            "menu": "메뉴명",
            "category": "음식 카테고리",
            "reason": "추천 이유 (50자 이내)",
            "price_range": "가격대 (예: 10,000-15,000원)"
        },
        {
            "type": "비슷한카테고리",
            "menu": "메뉴명",
            "category": "음식 카테고리",
            "reason": "추천 이유 (50자 이내)",
            "price_range": "가격대"
        },
        {
            "type": "날씨기반",
            "menu": "메뉴명",
            "category": "음식 카테고리",
            "reason": "추천 이유 (50자 이내)",
            "price_range": "가격대"
        }
    ],
    "weather_summary": "날씨 요약 (30자 이내)"
}
"#;

const RECIPE_SOURCE: &str = r#"'{{ menu_name }}' 메뉴의 {{ servings }}인분 레시피를 작성해주세요.

다음 형식으로 JSON 응답해주세요:
{
    "menu_name": "메뉴명",
    "servings": {{ servings }},
    "ingredients": [
        {"name": "재료명", "amount": "양"}
    ],
    "steps": [
        "1단계 설명",
        "2단계 설명"
    ],
    "cooking_time": "조리 시간",
    "difficulty": "쉬움/보통/어려움"
}
"#;

pub struct PromptRenderer {
    tera: Tera,
}

impl PromptRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (LUNCH_TEMPLATE, LUNCH_SOURCE),
            (CAFETERIA_TEMPLATE, CAFETERIA_SOURCE),
            (RECIPE_TEMPLATE, RECIPE_SOURCE),
        ])?;
        Ok(Self { tera })
    }

    pub fn lunch(
        &self,
        weather: &WeatherReading,
        preferences: &Preferences,
    ) -> Result<String, tera::Error> {
        let mut context = weather_context(weather);
        context.insert("num_people", &preferences.num_people);
        context.insert("food_type", preferences.food_type.label());
        context.insert("mood", preferences.mood.label());
        let moods: Vec<&str> = preferences.moods.iter().map(|mood| mood.label()).collect();
        context.insert("moods", &moods);
        self.tera.render(LUNCH_TEMPLATE, &context)
    }

    pub fn cafeteria(
        &self,
        weather: &WeatherReading,
        cafeteria_menu: &str,
    ) -> Result<String, tera::Error> {
        let mut context = weather_context(weather);
        context.insert("cafeteria_menu", cafeteria_menu);
        self.tera.render(CAFETERIA_TEMPLATE, &context)
    }

    pub fn recipe(&self, menu_name: &str, servings: u32) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("menu_name", menu_name);
        context.insert("servings", &servings);
        self.tera.render(RECIPE_TEMPLATE, &context)
    }
}

fn weather_context(weather: &WeatherReading) -> Context {
    let mut context = Context::new();
    context.insert("location", &weather.location);
    context.insert("temperature", &weather.temperature);
    context.insert("condition", weather.sky_condition.label());
    context.insert("precipitation", weather.precipitation.label());
    context
}
