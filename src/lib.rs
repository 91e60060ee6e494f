//! Food Database (FoodDB) Library
//!
//! Foods, their nutrient content, and foods composed of other foods.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
