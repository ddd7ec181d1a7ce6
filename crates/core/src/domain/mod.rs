pub mod preferences;
pub mod recipe;
pub mod recommendation;
pub mod weather;
