//! Data models
//!
//! The food aggregate, its string-list form, and the persisted records it
//! maps to.

mod arena;
mod entity;
mod food;
mod persist;
mod string_list;

pub use arena::FoodArena;
pub use entity::{FoodEntity, FoodRecord, IngredientRecord, NutrientRecord};
pub use food::{Food, FoodError, FoodKey, MAX_DESCRIPTION_LENGTH, UNPERSISTED_ID};
pub use persist::{get_food_domain_by_id, insert_food, persist_food, InsertedFood};
pub use string_list::{
    from_string_list, to_readable_string, to_string_list, FOOD_COLUMNS, MIN_FIELDS,
};
