use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub menu_name: String,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub cooking_time: String,
    pub difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
