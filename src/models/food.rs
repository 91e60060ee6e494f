//! Food model
//!
//! A named food with weight, nutrient content and ingredient references.
//! Ingredients are keys into a [`FoodArena`](super::FoodArena), so one food
//! can be a part of many composites without being copied.

use serde::Serialize;
use thiserror::Error;

use crate::nutrition::{round_up_to_2_decimal_places, Nutrients};

/// Id of a food that has not been stored yet
pub const UNPERSISTED_ID: i64 = -1;

/// Maximum stored description length, in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// Handle to a food inside a [`FoodArena`](super::FoodArena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FoodKey(pub(super) usize);

/// Errors raised by food construction, parsing and composition
#[derive(Debug, Error, PartialEq)]
pub enum FoodError {
    #[error("List must contain at least {expected} elements, got {found}")]
    NotEnoughFields { expected: usize, found: usize },

    #[error("Field '{field}' is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Adding {part:?} as an ingredient of {composite:?} would create a circular reference")]
    CycleDetected { composite: FoodKey, part: FoodKey },

    #[error("Unknown food {0:?}")]
    UnknownFood(FoodKey),
}

/// A food with nutritional information and its ingredients
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub id: i64,
    pub name: String,
    weight: f64, // grams
    pub nutrients: Nutrients,
    pub description: String,
    pub ingredients: Vec<FoodKey>,
}

impl Food {
    /// Create a food without ingredients. Weight is rounded up to 2 decimals.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        weight: f64,
        nutrients: Nutrients,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            weight: round_up_to_2_decimal_places(weight),
            nutrients,
            description: description.into(),
            ingredients: Vec::new(),
        }
    }

    /// Create a food with a given ingredient list
    pub fn with_ingredients(
        id: i64,
        name: impl Into<String>,
        weight: f64,
        nutrients: Nutrients,
        description: impl Into<String>,
        ingredients: Vec<FoodKey>,
    ) -> Self {
        Self {
            ingredients,
            ..Self::new(id, name, weight, nutrients, description)
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = round_up_to_2_decimal_places(weight);
    }

    /// Whether this food has been stored and has a real id
    pub fn is_persisted(&self) -> bool {
        self.id != UNPERSISTED_ID
    }

    /// Append an ingredient. Duplicates and cycles are not checked here;
    /// use [`FoodArena::add_ingredient`](super::FoodArena::add_ingredient)
    /// for a checked link.
    pub fn add_ingredient(&mut self, ingredient: FoodKey) {
        self.ingredients.push(ingredient);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{Carbohydrates, Energy, Fat, Protein, Salt};

    fn potato_nutrients() -> Nutrients {
        Nutrients::new(
            Energy::from_kcal(313.0),
            Fat::new(0.1, 0.02),
            Carbohydrates::new(23.2, 0.5),
            Protein::new(3.1),
            Salt::new(0.004),
        )
    }

    #[test]
    fn test_new_rounds_weight_up() {
        let food = Food::new(UNPERSISTED_ID, "Potato", 100.001, potato_nutrients(), "Root vegetable");
        assert_eq!(food.weight(), 100.01);
        assert!(food.ingredients.is_empty());
        assert!(!food.is_persisted());
    }

    #[test]
    fn test_set_weight_rounds_up() {
        let mut food = Food::new(3, "Potato", 100.0, potato_nutrients(), "");
        food.set_weight(42.123);
        assert_eq!(food.weight(), 42.13);
        assert!(food.is_persisted());
    }

    #[test]
    fn test_add_ingredient_keeps_duplicates() {
        let mut food = Food::new(1, "Stew", 500.0, Nutrients::zero(), "");
        food.add_ingredient(FoodKey(0));
        food.add_ingredient(FoodKey(0));
        assert_eq!(food.ingredients, vec![FoodKey(0), FoodKey(0)]);
    }

    #[test]
    fn test_error_messages() {
        let err = FoodError::NotEnoughFields { expected: 12, found: 3 };
        assert_eq!(err.to_string(), "List must contain at least 12 elements, got 3");
    }
}
