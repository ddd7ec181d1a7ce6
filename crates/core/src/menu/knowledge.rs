//! Static menu knowledge base.
//!
//! Tables are keyed by enums and resolved with exhaustive `match`es, so a
//! lookup can never miss: every category row carries a mandatory mid-band
//! list and the warm/cool lists are optional refinements.

use crate::domain::preferences::{Category, Mood};

/// Temperature bucket driving dish selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemperatureBand {
    Warm,
    Mid,
    Cool,
}

impl TemperatureBand {
    pub fn from_temperature(temperature: i32) -> Self {
        if temperature < 10 {
            Self::Warm
        } else if temperature > 25 {
            Self::Cool
        } else {
            Self::Mid
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Spiciness {
    NotSpicy,
    Medium,
    Spicy,
    VerySpicy,
}

#[derive(Debug, Clone, Copy)]
pub struct MenuSeed {
    pub name: &'static str,
    pub spiciness: Spiciness,
    pub reason: &'static str,
}

/// A knowledge-base dish tagged with the category it was collected from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuCandidate {
    pub name: &'static str,
    pub category: Category,
    pub spiciness: Spiciness,
    pub reason: &'static str,
}

impl MenuCandidate {
    fn from_seed(seed: &MenuSeed, category: Category) -> Self {
        Self { name: seed.name, category, spiciness: seed.spiciness, reason: seed.reason }
    }
}

#[derive(Debug)]
pub struct CategoryMenu {
    pub warm: Option<&'static [MenuSeed]>,
    pub cool: Option<&'static [MenuSeed]>,
    pub mid: &'static [MenuSeed],
}

impl CategoryMenu {
    /// Seeds for `band`, or the mid list when the category has no list for it.
    pub fn seeds(&self, band: TemperatureBand) -> &'static [MenuSeed] {
        let specific = match band {
            TemperatureBand::Warm => self.warm,
            TemperatureBand::Cool => self.cool,
            TemperatureBand::Mid => None,
        };
        specific.unwrap_or(self.mid)
    }
}

const fn seed(name: &'static str, spiciness: Spiciness, reason: &'static str) -> MenuSeed {
    MenuSeed { name, spiciness, reason }
}

const KOREAN_WARM: &[MenuSeed] = &[
    seed("김치찌개", Spiciness::Spicy, "얼큰한 국물로 몸을 녹이기 좋습니다"),
    seed("된장찌개", Spiciness::NotSpicy, "구수한 맛이 일품인 건강 메뉴입니다"),
    seed("부대찌개", Spiciness::Medium, "든든하고 푸짐한 한 끼입니다"),
    seed("갈비탕", Spiciness::NotSpicy, "영양 만점 보양식입니다"),
    seed("육개장", Spiciness::Spicy, "얼큰하고 시원한 국물이 속을 풀어줍니다"),
];

const KOREAN_COOL: &[MenuSeed] = &[
    seed("냉면", Spiciness::NotSpicy, "시원한 육수가 더위를 식혀줍니다"),
    seed("비빔냉면", Spiciness::Spicy, "새콤달콤 매콤한 맛이 일품입니다"),
    seed("콩국수", Spiciness::NotSpicy, "고소하고 시원한 여름 별미입니다"),
];

const KOREAN_MID: &[MenuSeed] = &[
    seed("비빔밥", Spiciness::Medium, "영양 균형이 잡힌 건강식입니다"),
    seed("불고기", Spiciness::NotSpicy, "달콤한 양념이 식욕을 돋웁니다"),
    seed("제육볶음", Spiciness::Spicy, "매콤한 맛이 밥도둑입니다"),
];

const CHINESE_WARM: &[MenuSeed] = &[
    seed("짬뽕", Spiciness::Spicy, "얼큰한 국물로 추위를 날립니다"),
    seed("짜장면", Spiciness::NotSpicy, "부담 없이 즐기는 국민 메뉴입니다"),
    seed("마라탕", Spiciness::VerySpicy, "얼얼한 맛이 중독성 있습니다"),
];

const CHINESE_COOL: &[MenuSeed] = &[
    seed("냉짬뽕", Spiciness::Spicy, "시원하고 얼큰한 맛의 조화입니다"),
    seed("냉짜장", Spiciness::NotSpicy, "시원하게 즐기는 짜장면입니다"),
];

const CHINESE_MID: &[MenuSeed] = &[
    seed("볶음밥", Spiciness::Medium, "간단하고 맛있는 한 끼입니다"),
    seed("탕수육", Spiciness::NotSpicy, "바삭하고 달콤한 인기 메뉴입니다"),
];

const JAPANESE_MID: &[MenuSeed] = &[
    seed("초밥", Spiciness::NotSpicy, "신선한 재료로 깔끔한 한 끼"),
    seed("돈카츠", Spiciness::NotSpicy, "바삭하고 든든한 식사"),
    seed("라멘", Spiciness::Medium, "진한 국물이 일품인 면 요리"),
    seed("우동", Spiciness::NotSpicy, "부드럽고 담백한 면 요리"),
];

const WESTERN_MID: &[MenuSeed] = &[
    seed("파스타", Spiciness::NotSpicy, "다양한 소스로 즐기는 면 요리"),
    seed("스테이크", Spiciness::NotSpicy, "육즙 가득한 고급 식사"),
    seed("리조또", Spiciness::NotSpicy, "크리미하고 고소한 맛"),
];

const BUNSIK_WARM: &[MenuSeed] = &[
    seed("떡볶이", Spiciness::Spicy, "매콤달콤 간식 같은 한 끼"),
    seed("라볶이", Spiciness::Spicy, "라면과 떡볶이의 환상 조합"),
];

const BUNSIK_MID: &[MenuSeed] = &[
    seed("김밥", Spiciness::NotSpicy, "간편하고 든든한 한 끼"),
    seed("우동", Spiciness::NotSpicy, "담백하고 부드러운 면 요리"),
];

static KOREAN: CategoryMenu =
    CategoryMenu { warm: Some(KOREAN_WARM), cool: Some(KOREAN_COOL), mid: KOREAN_MID };
static CHINESE: CategoryMenu =
    CategoryMenu { warm: Some(CHINESE_WARM), cool: Some(CHINESE_COOL), mid: CHINESE_MID };
static JAPANESE: CategoryMenu = CategoryMenu { warm: None, cool: None, mid: JAPANESE_MID };
static WESTERN: CategoryMenu = CategoryMenu { warm: None, cool: None, mid: WESTERN_MID };
static BUNSIK: CategoryMenu = CategoryMenu { warm: Some(BUNSIK_WARM), cool: None, mid: BUNSIK_MID };

pub fn category_menu(category: Category) -> &'static CategoryMenu {
    match category {
        Category::Korean => &KOREAN,
        Category::Chinese => &CHINESE,
        Category::Japanese => &JAPANESE,
        Category::Western => &WESTERN,
        Category::Bunsik => &BUNSIK,
    }
}

/// Categories a mood leans towards; empty means no restriction.
pub fn mood_categories(mood: Mood) -> &'static [Category] {
    match mood {
        Mood::Joyful => &[Category::Bunsik, Category::Western],
        Mood::Sad | Mood::Angry => &[Category::Korean, Category::Chinese],
        Mood::Tired => &[Category::Korean, Category::Japanese],
        Mood::Stressed => &[Category::Chinese, Category::Korean],
        Mood::Neutral => &[],
    }
}

/// Candidates for `categories` in table order, falling back to each
/// category's mid list when it has none for `band`.
pub fn collect_candidates(categories: &[Category], band: TemperatureBand) -> Vec<MenuCandidate> {
    categories
        .iter()
        .flat_map(|&category| {
            category_menu(category)
                .seeds(band)
                .iter()
                .map(move |seed| MenuCandidate::from_seed(seed, category))
        })
        .collect()
}

pub const DEFAULT_CANDIDATE: MenuCandidate = MenuCandidate {
    name: "비빔밥",
    category: Category::Korean,
    spiciness: Spiciness::Medium,
    reason: "영양 균형이 잡힌 건강식입니다",
};

pub const FALLBACK_ALTERNATIVES: [&str; 3] = ["김치찌개", "짜장면", "돈카츠"];
