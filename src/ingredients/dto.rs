use serde::Deserialize;

/// Body for creating, renaming or attaching an ingredient.
#[derive(Debug, Deserialize)]
pub struct IngredientPayload {
    pub name: String,
}
