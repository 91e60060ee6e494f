//! Food MCP Tools
//!
//! Tools for listing, adding, combining and scaling foods.

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{
    from_string_list, get_food_domain_by_id, persist_food, to_readable_string, to_string_list,
    Food, FoodArena, FoodEntity, FoodError, FoodKey, FOOD_COLUMNS, MAX_DESCRIPTION_LENGTH,
    UNPERSISTED_ID,
};
use crate::nutrition::{Carbohydrates, Energy, Fat, Nutrients, Protein, Salt};

/// Data for adding a new food
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddFoodRequest {
    pub name: String,
    pub weight: f64,
    /// Energy in kcal; takes precedence over `kj`
    pub kcal: Option<f64>,
    pub kj: Option<f64>,
    #[serde(default)]
    pub fat_total: f64,
    #[serde(default)]
    pub fat_saturated: f64,
    #[serde(default)]
    pub carbs_total: f64,
    #[serde(default)]
    pub carbs_sugar: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub salt: f64,
    #[serde(default)]
    pub description: String,
    /// Ids of stored foods this food is made of
    #[serde(default)]
    pub ingredient_ids: Vec<i64>,
}

/// Data for combining two stored foods
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombineFoodsRequest {
    pub first_id: i64,
    pub second_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub save: bool,
}

/// Data for scaling a stored food
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaleFoodRequest {
    pub id: i64,
    pub factor: f64,
    pub name: Option<String>,
    #[serde(default)]
    pub save: bool,
}

/// Ingredient entry of a food detail
#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub id: i64,
    pub name: String,
    pub weight: f64,
}

/// Full food detail response
#[derive(Debug, Serialize)]
pub struct FoodDetail {
    pub id: i64,
    pub name: String,
    pub weight: f64,
    pub energy_kcal: i64,
    pub energy_kj: i64,
    pub fat_total: f64,
    pub fat_saturated: f64,
    pub carbs_total: f64,
    pub carbs_sugar: f64,
    pub protein_total: f64,
    pub salt_total: f64,
    pub description: String,
    pub ingredients: Vec<IngredientSummary>,
    pub row: Vec<String>,
    pub readable: String,
}

impl FoodDetail {
    pub fn from_arena(arena: &FoodArena, key: FoodKey) -> Result<Self, FoodError> {
        let food = arena.get(key).ok_or(FoodError::UnknownFood(key))?;
        let n = &food.nutrients;

        Ok(Self {
            id: food.id,
            name: food.name.clone(),
            weight: food.weight(),
            energy_kcal: n.energy.kcal(),
            energy_kj: n.energy.kj(),
            fat_total: n.fat.total(),
            fat_saturated: n.fat.saturated(),
            carbs_total: n.carbohydrates.total(),
            carbs_sugar: n.carbohydrates.sugar(),
            protein_total: n.protein.total(),
            salt_total: n.salt.total(),
            description: food.description.clone(),
            ingredients: arena
                .ingredients_of(key)
                .into_iter()
                .map(|i| IngredientSummary {
                    id: i.id,
                    name: i.name.clone(),
                    weight: i.weight(),
                })
                .collect(),
            row: to_string_list(arena, key)?,
            readable: to_readable_string(arena, key)?,
        })
    }
}

/// Response for list_foods: one row per food, in column order
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub total: usize,
}

/// Response for add_food
#[derive(Debug, Serialize)]
pub struct AddFoodResponse {
    pub id: i64,
    pub name: String,
    pub row: Vec<String>,
}

/// Response for combine_foods and scale_food
#[derive(Debug, Serialize)]
pub struct ComposedFoodResponse {
    pub food: FoodDetail,
    pub saved: bool,
}

fn validate_description(description: &str) -> Result<(), String> {
    let length = description.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "description is {} characters, at most {} allowed",
            length, MAX_DESCRIPTION_LENGTH
        ));
    }
    Ok(())
}

/// Load a stored food into the arena or fail with a user-facing message
fn load_food(conn: &rusqlite::Connection, arena: &mut FoodArena, id: i64) -> Result<FoodKey, String> {
    get_food_domain_by_id(conn, arena, id)
        .map_err(|e| format!("Failed to get food: {}", e))?
        .ok_or_else(|| format!("Food not found with id: {}", id))
}

/// List all foods as string-list rows
pub fn list_foods(db: &Database) -> Result<ListFoodsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entities = FoodEntity::get_all(&conn)
        .map_err(|e| format!("Failed to list foods: {}", e))?;

    let mut arena = FoodArena::new();
    let rows = entities
        .iter()
        .map(|entity| {
            let key = entity.to_domain(&mut arena);
            to_string_list(&arena, key)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Failed to format foods: {}", e))?;

    let total = rows.len();
    Ok(ListFoodsResponse {
        columns: FOOD_COLUMNS.to_vec(),
        rows,
        total,
    })
}

/// Get a food by ID
pub fn get_food(db: &Database, id: i64) -> Result<Option<FoodDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let mut arena = FoodArena::new();
    let key = get_food_domain_by_id(&conn, &mut arena, id)
        .map_err(|e| format!("Failed to get food: {}", e))?;

    match key {
        Some(key) => FoodDetail::from_arena(&arena, key)
            .map(Some)
            .map_err(|e| format!("Failed to format food: {}", e)),
        None => Ok(None),
    }
}

/// Add a new food
pub fn add_food(db: &Database, data: AddFoodRequest) -> Result<AddFoodResponse, String> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err("Food name cannot be empty".to_string());
    }
    if !(data.weight > 0.0) {
        return Err("weight must be greater than 0".to_string());
    }

    let values = [
        ("kcal", data.kcal.unwrap_or(0.0)),
        ("kj", data.kj.unwrap_or(0.0)),
        ("fat_total", data.fat_total),
        ("fat_saturated", data.fat_saturated),
        ("carbs_total", data.carbs_total),
        ("carbs_sugar", data.carbs_sugar),
        ("protein", data.protein),
        ("salt", data.salt),
    ];
    for (field, value) in values {
        if value < 0.0 || !value.is_finite() {
            return Err(format!("{} must be a non-negative number", field));
        }
    }
    validate_description(&data.description)?;

    let energy = match (data.kcal, data.kj) {
        (Some(kcal), _) => Energy::from_kcal(kcal),
        (None, Some(kj)) => Energy::from_kj(kj),
        (None, None) => Energy::default(),
    };
    let nutrients = Nutrients::new(
        energy,
        Fat::new(data.fat_total, data.fat_saturated),
        Carbohydrates::new(data.carbs_total, data.carbs_sugar),
        Protein::new(data.protein),
        Salt::new(data.salt),
    );

    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let mut arena = FoodArena::new();

    let mut ingredients = Vec::with_capacity(data.ingredient_ids.len());
    for id in &data.ingredient_ids {
        ingredients.push(load_food(&conn, &mut arena, *id)?);
    }

    let key = arena.insert(Food::with_ingredients(
        UNPERSISTED_ID,
        name,
        data.weight,
        nutrients,
        data.description.clone(),
        ingredients,
    ));

    let id = persist_food(&mut conn, &mut arena, key)
        .map_err(|e| format!("Failed to create food: {}", e))?;
    let row = to_string_list(&arena, key).map_err(|e| e.to_string())?;

    Ok(AddFoodResponse {
        id,
        name: name.to_string(),
        row,
    })
}

/// Combine two stored foods, optionally storing the result
pub fn combine_foods(db: &Database, data: CombineFoodsRequest) -> Result<ComposedFoodResponse, String> {
    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let mut arena = FoodArena::new();

    let first = load_food(&conn, &mut arena, data.first_id)?;
    let second = load_food(&conn, &mut arena, data.second_id)?;
    let combined = arena
        .combine(first, second)
        .map_err(|e| format!("Failed to combine foods: {}", e))?;

    if let Some(food) = arena.get_mut(combined) {
        if let Some(name) = data.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            food.name = name.to_string();
        }
        if let Some(description) = data.description {
            validate_description(&description)?;
            food.description = description;
        }
    }

    if data.save {
        let id = persist_food(&mut conn, &mut arena, combined)
            .map_err(|e| format!("Failed to store combined food: {}", e))?;
        tracing::info!(first = data.first_id, second = data.second_id, id, "Stored combined food");
    }

    let food = FoodDetail::from_arena(&arena, combined).map_err(|e| e.to_string())?;
    Ok(ComposedFoodResponse {
        food,
        saved: data.save,
    })
}

/// Scale a stored food, optionally storing the result as a new food
pub fn scale_food(db: &Database, data: ScaleFoodRequest) -> Result<ComposedFoodResponse, String> {
    if !(data.factor > 0.0) || !data.factor.is_finite() {
        return Err("factor must be a positive number".to_string());
    }

    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let mut arena = FoodArena::new();

    let original = load_food(&conn, &mut arena, data.id)?;
    let scaled = arena
        .scale(original, data.factor)
        .map_err(|e| format!("Failed to scale food: {}", e))?;

    if let Some(food) = arena.get_mut(scaled) {
        if let Some(name) = data.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            food.name = name.to_string();
        }
        if data.save {
            // The scaled copy is a different food from the one it came from
            food.id = UNPERSISTED_ID;
        }
    }

    if data.save {
        let id = persist_food(&mut conn, &mut arena, scaled)
            .map_err(|e| format!("Failed to store scaled food: {}", e))?;
        tracing::info!(source = data.id, factor = data.factor, id, "Stored scaled food");
    }

    let food = FoodDetail::from_arena(&arena, scaled).map_err(|e| e.to_string())?;
    Ok(ComposedFoodResponse {
        food,
        saved: data.save,
    })
}

/// Parse a string-list row into a food without storing it
pub fn parse_food_row(fields: &[String]) -> Result<FoodDetail, String> {
    let food = from_string_list(fields).map_err(|e| e.to_string())?;
    let mut arena = FoodArena::new();
    let key = arena.insert(food);
    FoodDetail::from_arena(&arena, key).map_err(|e| e.to_string())
}
