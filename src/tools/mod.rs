//! FoodDB Tools module
//!
//! MCP tool implementations for the food database.

pub mod foods;
pub mod status;
