use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Cuisine families the knowledge base is organized by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Korean,
    Chinese,
    Japanese,
    Western,
    Bunsik,
}

impl Category {
    pub const ALL: [Category; 5] =
        [Self::Korean, Self::Chinese, Self::Japanese, Self::Western, Self::Bunsik];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Korean => "한식",
            Self::Chinese => "중식",
            Self::Japanese => "일식",
            Self::Western => "양식",
            Self::Bunsik => "분식",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == value.trim())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FoodType {
    #[default]
    Any,
    Only(Category),
}

impl FoodType {
    pub const ANY_LABEL: &'static str = "상관없음";

    /// Unrecognized values mean "no preference".
    pub fn parse_lenient(value: &str) -> Self {
        Category::from_label(value).map(Self::Only).unwrap_or(Self::Any)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Any => Self::ANY_LABEL,
            Self::Only(category) => category.label(),
        }
    }

    pub fn categories(&self) -> &'static [Category] {
        match self {
            Self::Any => &Category::ALL,
            Self::Only(Category::Korean) => &[Category::Korean],
            Self::Only(Category::Chinese) => &[Category::Chinese],
            Self::Only(Category::Japanese) => &[Category::Japanese],
            Self::Only(Category::Western) => &[Category::Western],
            Self::Only(Category::Bunsik) => &[Category::Bunsik],
        }
    }
}

impl Serialize for FoodType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for FoodType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse_lenient).unwrap_or_default())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mood {
    Joyful,
    Sad,
    Angry,
    Tired,
    Stressed,
    #[default]
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 6] =
        [Self::Joyful, Self::Sad, Self::Angry, Self::Tired, Self::Stressed, Self::Neutral];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Joyful => "기쁜",
            Self::Sad => "슬픈",
            Self::Angry => "화난",
            Self::Tired => "피곤한",
            Self::Stressed => "스트레스",
            Self::Neutral => "평범한",
        }
    }

    /// Unrecognized values mean "neutral".
    pub fn parse_lenient(value: &str) -> Self {
        Self::ALL.into_iter().find(|mood| mood.label() == value.trim()).unwrap_or_default()
    }
}

impl Serialize for Mood {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse_lenient).unwrap_or_default())
    }
}

/// Caller preferences for a single recommendation.
///
/// `num_people` and `moods` only feed the advisor prompt; the rule-based
/// path ignores them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub food_type: FoodType,
    pub mood: Mood,
    pub num_people: u32,
    pub moods: Vec<Mood>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self { food_type: FoodType::Any, mood: Mood::Neutral, num_people: 1, moods: Vec::new() }
    }
}

impl Preferences {
    pub fn new(food_type: FoodType, mood: Mood, num_people: u32, moods: Vec<Mood>) -> Self {
        let num_people = num_people.max(1);
        let mut moods = moods;
        moods.truncate(num_people as usize);
        Self { food_type, mood, num_people, moods }
    }
}
