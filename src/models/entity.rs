//! Persisted food records
//!
//! Flat row types for the `foods`, `nutrients` and `ingredients` tables, the
//! queries that load them, and the mapping to and from the domain model.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use super::arena::FoodArena;
use super::food::{Food, FoodKey, UNPERSISTED_ID};
use crate::db::DbResult;
use crate::nutrition::{Carbohydrates, Energy, Fat, Nutrients, Protein, Salt};

/// Row of the `nutrients` table, keyed 1:1 by the owning food
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientRecord {
    pub food_id: i64,
    pub energy_kcal: i64,
    pub energy_kj: i64,
    pub fat_total: f64,
    pub fat_saturated: f64,
    pub carbs_total: f64,
    pub carbs_sugar: f64,
    pub protein_total: f64,
    pub salt_total: f64,
}

impl NutrientRecord {
    /// Map domain nutrients to a row owned by `food_id`
    pub fn from_domain(nutrients: &Nutrients, food_id: i64) -> Self {
        Self {
            food_id,
            energy_kcal: nutrients.energy.kcal(),
            energy_kj: nutrients.energy.kj(),
            fat_total: nutrients.fat.total(),
            fat_saturated: nutrients.fat.saturated(),
            carbs_total: nutrients.carbohydrates.total(),
            carbs_sugar: nutrients.carbohydrates.sugar(),
            protein_total: nutrients.protein.total(),
            salt_total: nutrients.salt.total(),
        }
    }

    /// Map the row back to domain nutrients, keeping the stored kcal/kJ pair
    pub fn to_domain(&self) -> Nutrients {
        Nutrients::new(
            Energy::from_parts(self.energy_kcal, self.energy_kj),
            Fat::new(self.fat_total, self.fat_saturated),
            Carbohydrates::new(self.carbs_total, self.carbs_sugar),
            Protein::new(self.protein_total),
            Salt::new(self.salt_total),
        )
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            food_id: row.get("food_id")?,
            energy_kcal: row.get("energy_kcal")?,
            energy_kj: row.get("energy_kj")?,
            fat_total: row.get("fat_total")?,
            fat_saturated: row.get("fat_saturated")?,
            carbs_total: row.get("carbs_total")?,
            carbs_sugar: row.get("carbs_sugar")?,
            protein_total: row.get("protein_total")?,
            salt_total: row.get("salt_total")?,
        })
    }

    /// Get the nutrient row of a food
    pub fn get_for_food(conn: &Connection, food_id: i64) -> DbResult<Option<Self>> {
        let record = conn
            .query_row(
                "SELECT * FROM nutrients WHERE food_id = ?1",
                [food_id],
                Self::from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Insert this row
    pub fn insert(&self, conn: &Connection) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO nutrients (
                food_id, energy_kcal, energy_kj, fat_total, fat_saturated,
                carbs_total, carbs_sugar, protein_total, salt_total
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                self.food_id,
                self.energy_kcal,
                self.energy_kj,
                self.fat_total,
                self.fat_saturated,
                self.carbs_total,
                self.carbs_sugar,
                self.protein_total,
                self.salt_total,
            ],
        )?;
        Ok(())
    }
}

/// Row of the `foods` table. `food_id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodRecord {
    pub food_id: Option<i64>,
    pub name: String,
    pub weight: f64,
    pub description: String,
}

impl FoodRecord {
    /// Map a domain food, leaving the id out when it is unstored
    pub fn from_domain(food: &Food) -> Self {
        Self {
            food_id: food.is_persisted().then_some(food.id),
            name: food.name.clone(),
            weight: food.weight(),
            description: food.description.clone(),
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            food_id: Some(row.get("food_id")?),
            name: row.get("name")?,
            weight: row.get("weight")?,
            description: row.get("description")?,
        })
    }

    /// Get a food row by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let record = conn
            .query_row("SELECT * FROM foods WHERE food_id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(record)
    }

    /// All food rows, by id
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods ORDER BY food_id ASC")?;
        let records = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Count stored foods
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert this row and return the id it was stored under
    pub fn insert(&self, conn: &Connection) -> DbResult<i64> {
        match self.food_id {
            Some(id) => {
                conn.execute(
                    "INSERT INTO foods (food_id, name, weight, description) VALUES (?1, ?2, ?3, ?4)",
                    params![id, self.name, self.weight, self.description],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO foods (name, weight, description) VALUES (?1, ?2, ?3)",
                    params![self.name, self.weight, self.description],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }
}

/// Row of the `ingredients` table: `food_id_part` is one ingredient of `food_id_complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngredientRecord {
    pub food_id_complete: i64,
    pub food_id_part: i64,
}

impl IngredientRecord {
    /// The row linking a food to itself
    pub fn self_link(food_id: i64) -> Self {
        Self {
            food_id_complete: food_id,
            food_id_part: food_id,
        }
    }

    pub fn is_self_link(&self) -> bool {
        self.food_id_complete == self.food_id_part
    }

    /// Insert this row. Returns false if the pair was already stored.
    pub fn insert(&self, conn: &Connection) -> DbResult<bool> {
        let rows = conn.execute(
            "INSERT OR IGNORE INTO ingredients (food_id_complete, food_id_part) VALUES (?1, ?2)",
            [self.food_id_complete, self.food_id_part],
        )?;
        Ok(rows > 0)
    }

    /// All rows for a composite food, self link included
    pub fn for_food(conn: &Connection, food_id_complete: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT food_id_complete, food_id_part FROM ingredients
             WHERE food_id_complete = ?1 ORDER BY rowid",
        )?;
        let records = stmt
            .query_map([food_id_complete], |row| {
                Ok(Self {
                    food_id_complete: row.get(0)?,
                    food_id_part: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Ids of the foods a composite is made of, self link excluded
    pub fn part_ids_for(conn: &Connection, food_id_complete: i64) -> DbResult<Vec<i64>> {
        Ok(Self::for_food(conn, food_id_complete)?
            .into_iter()
            .filter(|r| !r.is_self_link())
            .map(|r| r.food_id_part)
            .collect())
    }
}

/// A loaded food: its row, its nutrient row and the foods it is made of.
///
/// Parts are loaded one level deep; their own `parts` are empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodEntity {
    pub food: FoodRecord,
    pub nutrient: Option<NutrientRecord>,
    pub parts: Vec<FoodEntity>,
}

impl FoodEntity {
    pub fn id(&self) -> i64 {
        self.food.food_id.unwrap_or(UNPERSISTED_ID)
    }

    fn load_shallow(conn: &Connection, food: FoodRecord) -> DbResult<Self> {
        let nutrient = match food.food_id {
            Some(id) => NutrientRecord::get_for_food(conn, id)?,
            None => None,
        };
        Ok(Self {
            food,
            nutrient,
            parts: Vec::new(),
        })
    }

    fn load(conn: &Connection, food: FoodRecord) -> DbResult<Self> {
        let mut entity = Self::load_shallow(conn, food)?;
        for part_id in IngredientRecord::part_ids_for(conn, entity.id())? {
            if let Some(part) = FoodRecord::get_by_id(conn, part_id)? {
                entity.parts.push(Self::load_shallow(conn, part)?);
            }
        }
        Ok(entity)
    }

    /// Get a food with its nutrients and parts
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        match FoodRecord::get_by_id(conn, id)? {
            Some(food) => Ok(Some(Self::load(conn, food)?)),
            None => Ok(None),
        }
    }

    /// Get every food with its nutrients and parts, by id
    pub fn get_all(conn: &Connection) -> DbResult<Vec<Self>> {
        FoodRecord::list(conn)?
            .into_iter()
            .map(|food| Self::load(conn, food))
            .collect()
    }

    /// Map into the domain model, adding the food and its parts to `arena`.
    ///
    /// A food already in the arena under the same id is reused, so a part
    /// shared by several loaded foods has a single entry. A reused entry
    /// loaded without its parts picks them up here. A missing nutrient row
    /// maps to zero nutrients.
    pub fn to_domain(&self, arena: &mut FoodArena) -> FoodKey {
        let ingredients: Vec<FoodKey> =
            self.parts.iter().map(|part| part.to_domain(arena)).collect();

        if let Some(existing) = arena.find_by_id(self.id()) {
            if let Some(food) = arena.get_mut(existing) {
                if food.ingredients.is_empty() {
                    food.ingredients = ingredients;
                }
            }
            return existing;
        }

        let nutrients = self
            .nutrient
            .as_ref()
            .map(NutrientRecord::to_domain)
            .unwrap_or_else(Nutrients::zero);

        arena.insert(Food::with_ingredients(
            self.id(),
            self.food.name.clone(),
            self.food.weight,
            nutrients,
            self.food.description.clone(),
            ingredients,
        ))
    }

    /// Human-readable dump of the stored rows
    pub fn describe(&self) -> String {
        let mut text = format!(
            "Name: {}\nWeight: {}g\nDescription: {}\n",
            self.food.name, self.food.weight, self.food.description
        );

        match &self.nutrient {
            Some(n) => {
                text.push_str("Nutritional Info:\n");
                text.push_str(&format!("  Energy: {} kcal / {} kJ\n", n.energy_kcal, n.energy_kj));
                text.push_str(&format!(
                    "  Total Fat: {}g (Saturated: {}g)\n",
                    n.fat_total, n.fat_saturated
                ));
                text.push_str(&format!(
                    "  Total Carbs: {}g (Sugar: {}g)\n",
                    n.carbs_total, n.carbs_sugar
                ));
                text.push_str(&format!("  Protein: {}g\n", n.protein_total));
                text.push_str(&format!("  Salt: {}g\n", n.salt_total));
            }
            None => text.push_str("No nutrient information available.\n"),
        }

        if self.parts.is_empty() {
            text.push_str("No ingredients listed.\n");
        } else {
            text.push_str("Ingredients:\n");
            for part in &self.parts {
                text.push_str(&format!("  Ingredient: {}\n", part.food.name));
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn peach_nutrients() -> Nutrients {
        Nutrients::new(
            Energy::from_kcal(200.0),
            Fat::new(1.0, 2.0),
            Carbohydrates::new(30.0, 5.0),
            Protein::new(2.0),
            Salt::new(0.2),
        )
    }

    fn store(conn: &Connection, name: &str, nutrients: &Nutrients) -> i64 {
        let food = Food::new(UNPERSISTED_ID, name, 150.0, *nutrients, "");
        let id = FoodRecord::from_domain(&food).insert(conn).unwrap();
        NutrientRecord::from_domain(nutrients, id).insert(conn).unwrap();
        IngredientRecord::self_link(id).insert(conn).unwrap();
        id
    }

    #[test]
    fn test_nutrient_record_round_trip() {
        let record = NutrientRecord::from_domain(&peach_nutrients(), 3);
        assert_eq!(record.food_id, 3);
        assert_eq!(record.energy_kcal, 200);
        assert_eq!(record.energy_kj, 837);
        assert_eq!(record.fat_saturated, 2.0);
        assert_eq!(record.to_domain(), peach_nutrients());
    }

    #[test]
    fn test_food_record_omits_unstored_id() {
        let food = Food::new(UNPERSISTED_ID, "Peach", 150.0, peach_nutrients(), "Fruit");
        assert_eq!(FoodRecord::from_domain(&food).food_id, None);

        let stored = Food::new(12, "Peach", 150.0, peach_nutrients(), "Fruit");
        assert_eq!(FoodRecord::from_domain(&stored).food_id, Some(12));
    }

    #[test]
    fn test_get_by_id_missing_is_none() {
        let conn = setup();
        assert!(FoodEntity::get_by_id(&conn, 42).unwrap().is_none());
        assert!(FoodRecord::get_by_id(&conn, 42).unwrap().is_none());
        assert!(NutrientRecord::get_for_food(&conn, 42).unwrap().is_none());
    }

    #[test]
    fn test_load_entity_with_parts() {
        let conn = setup();
        let peach = store(&conn, "Peach", &peach_nutrients());
        let pea = store(&conn, "Pea", &Nutrients::zero());
        let salad = store(&conn, "Salad", &peach_nutrients());
        IngredientRecord { food_id_complete: salad, food_id_part: peach }.insert(&conn).unwrap();
        IngredientRecord { food_id_complete: salad, food_id_part: pea }.insert(&conn).unwrap();

        assert_eq!(IngredientRecord::part_ids_for(&conn, salad).unwrap(), vec![peach, pea]);
        assert_eq!(IngredientRecord::for_food(&conn, salad).unwrap().len(), 3);

        let entity = FoodEntity::get_by_id(&conn, salad).unwrap().unwrap();
        assert_eq!(entity.id(), salad);
        assert_eq!(entity.parts.len(), 2);
        assert_eq!(entity.parts[0].food.name, "Peach");
        assert!(entity.parts[0].parts.is_empty());

        let all = FoodEntity::get_all(&conn).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(FoodRecord::count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_entity_to_domain() {
        let conn = setup();
        let peach = store(&conn, "Peach", &peach_nutrients());
        let salad = store(&conn, "Salad", &peach_nutrients());
        IngredientRecord { food_id_complete: salad, food_id_part: peach }.insert(&conn).unwrap();

        let entity = FoodEntity::get_by_id(&conn, salad).unwrap().unwrap();
        let mut arena = FoodArena::new();
        let key = entity.to_domain(&mut arena);

        let food = &arena[key];
        assert_eq!(food.id, salad);
        assert_eq!(food.weight(), 150.0);
        assert_eq!(food.nutrients, peach_nutrients());
        assert_eq!(arena.ingredients_of(key)[0].id, peach);
    }

    #[test]
    fn test_shared_part_maps_to_one_arena_entry() {
        let conn = setup();
        let pea = store(&conn, "Pea", &Nutrients::zero());
        let soup = store(&conn, "Soup", &peach_nutrients());
        let stew = store(&conn, "Stew", &peach_nutrients());
        IngredientRecord { food_id_complete: soup, food_id_part: pea }.insert(&conn).unwrap();
        IngredientRecord { food_id_complete: stew, food_id_part: pea }.insert(&conn).unwrap();

        let mut arena = FoodArena::new();
        let soup_key = FoodEntity::get_by_id(&conn, soup).unwrap().unwrap().to_domain(&mut arena);
        let stew_key = FoodEntity::get_by_id(&conn, stew).unwrap().unwrap().to_domain(&mut arena);

        assert_eq!(arena.len(), 3);
        assert_eq!(arena[soup_key].ingredients, arena[stew_key].ingredients);

        // Loading the same food again reuses its entry
        let again = FoodEntity::get_by_id(&conn, soup).unwrap().unwrap().to_domain(&mut arena);
        assert_eq!(again, soup_key);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_reused_entry_picks_up_parts() {
        let conn = setup();
        let pea = store(&conn, "Pea", &Nutrients::zero());
        let soup = store(&conn, "Soup", &peach_nutrients());
        let meal = store(&conn, "Meal", &peach_nutrients());
        IngredientRecord { food_id_complete: soup, food_id_part: pea }.insert(&conn).unwrap();
        IngredientRecord { food_id_complete: meal, food_id_part: soup }.insert(&conn).unwrap();

        let mut arena = FoodArena::new();
        FoodEntity::get_by_id(&conn, meal).unwrap().unwrap().to_domain(&mut arena);
        let soup_key = arena.find_by_id(soup).unwrap();
        assert!(arena[soup_key].ingredients.is_empty());

        let loaded = FoodEntity::get_by_id(&conn, soup).unwrap().unwrap().to_domain(&mut arena);
        assert_eq!(loaded, soup_key);
        assert_eq!(arena.ingredients_of(soup_key)[0].id, pea);
    }

    #[test]
    fn test_nutrient_row_keeps_stored_kj() {
        let conn = setup();
        let broth = Nutrients::new(
            Energy::from_kj(1000.0),
            Fat::default(),
            Carbohydrates::default(),
            Protein::default(),
            Salt::default(),
        );
        let id = store(&conn, "Broth", &broth);

        let stored = NutrientRecord::get_for_food(&conn, id).unwrap().unwrap();
        assert_eq!(stored.energy_kj, 1000);
        assert_eq!(stored.to_domain().energy.kj(), 1000);
        assert_eq!(stored.to_domain(), broth);
    }

    #[test]
    fn test_duplicate_ingredient_row_is_ignored() {
        let conn = setup();
        let id = store(&conn, "Pea", &Nutrients::zero());
        assert!(!IngredientRecord::self_link(id).insert(&conn).unwrap());
    }

    #[test]
    fn test_missing_nutrients_map_to_zero() {
        let entity = FoodEntity {
            food: FoodRecord {
                food_id: Some(1),
                name: "Water".to_string(),
                weight: 250.0,
                description: String::new(),
            },
            nutrient: None,
            parts: Vec::new(),
        };
        let mut arena = FoodArena::new();
        let key = entity.to_domain(&mut arena);
        assert_eq!(arena[key].nutrients, Nutrients::zero());

        let text = entity.describe();
        assert!(text.contains("No nutrient information available."));
        assert!(text.contains("No ingredients listed."));
    }
}
