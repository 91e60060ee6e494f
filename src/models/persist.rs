//! Storing domain foods
//!
//! Inserting a food is a two-step protocol. The food and nutrient rows are
//! written first, which yields the generated id as an [`InsertedFood`]; only
//! then can the ingredient rows that reference that id be written.

use std::collections::HashSet;

use rusqlite::Connection;

use super::arena::FoodArena;
use super::entity::{FoodEntity, FoodRecord, IngredientRecord, NutrientRecord};
use super::food::{Food, FoodError, FoodKey};
use crate::db::DbResult;

/// A food whose rows exist but whose ingredient links are not yet written
#[derive(Debug, PartialEq, Eq)]
#[must_use = "ingredient links are only written by `link_ingredients`"]
pub struct InsertedFood {
    id: i64,
}

impl InsertedFood {
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Write the self link plus one link per part, returning the food id.
    /// Repeated part ids collapse onto one row.
    pub fn link_ingredients(self, conn: &Connection, part_ids: &[i64]) -> DbResult<i64> {
        IngredientRecord::self_link(self.id).insert(conn)?;
        for &part_id in part_ids {
            IngredientRecord {
                food_id_complete: self.id,
                food_id_part: part_id,
            }
            .insert(conn)?;
        }
        tracing::debug!(food_id = self.id, parts = part_ids.len(), "Linked ingredients");
        Ok(self.id)
    }
}

/// Insert the food and nutrient rows of a food in one transaction
pub fn insert_food(conn: &mut Connection, food: &Food) -> DbResult<InsertedFood> {
    let tx = conn.transaction()?;
    let id = FoodRecord::from_domain(food).insert(&tx)?;
    NutrientRecord::from_domain(&food.nutrients, id).insert(&tx)?;
    tx.commit()?;

    tracing::info!(food_id = id, name = %food.name, "Inserted food");
    Ok(InsertedFood { id })
}

/// Store a food from the arena and return its id.
///
/// Already stored foods are left alone. Unstored ingredients are stored
/// first, and every newly stored food gets its arena id updated.
pub fn persist_food(conn: &mut Connection, arena: &mut FoodArena, key: FoodKey) -> DbResult<i64> {
    let mut in_progress = HashSet::new();
    persist_inner(conn, arena, key, &mut in_progress)
}

fn persist_inner(
    conn: &mut Connection,
    arena: &mut FoodArena,
    key: FoodKey,
    in_progress: &mut HashSet<FoodKey>,
) -> DbResult<i64> {
    let food = arena.get(key).ok_or(FoodError::UnknownFood(key))?;
    if food.is_persisted() {
        return Ok(food.id);
    }
    if !in_progress.insert(key) {
        return Err(FoodError::CycleDetected { composite: key, part: key }.into());
    }

    let ingredients = food.ingredients.clone();
    let mut part_ids = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        part_ids.push(persist_inner(conn, arena, ingredient, in_progress)?);
    }

    let food = arena.get(key).ok_or(FoodError::UnknownFood(key))?;
    let inserted = insert_food(conn, food)?;
    let id = inserted.link_ingredients(conn, &part_ids)?;

    if let Some(food) = arena.get_mut(key) {
        food.id = id;
    }
    in_progress.remove(&key);
    Ok(id)
}

/// Load a stored food into the arena
pub fn get_food_domain_by_id(
    conn: &Connection,
    arena: &mut FoodArena,
    id: i64,
) -> DbResult<Option<FoodKey>> {
    Ok(FoodEntity::get_by_id(conn, id)?.map(|entity| entity.to_domain(arena)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::DbError;
    use crate::models::UNPERSISTED_ID;
    use crate::nutrition::{Carbohydrates, Energy, Fat, Nutrients, Protein, Salt};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn pea() -> Food {
        Food::new(
            UNPERSISTED_ID,
            "Pea",
            100.0,
            Nutrients::new(
                Energy::from_kcal(81.0),
                Fat::new(0.4, 0.1),
                Carbohydrates::new(14.0, 6.0),
                Protein::new(5.0),
                Salt::new(0.05),
            ),
            "Green little balls.",
        )
    }

    #[test]
    fn test_two_phase_insert_writes_self_link() {
        let mut conn = setup();
        let inserted = insert_food(&mut conn, &pea()).unwrap();
        let id = inserted.id();
        assert!(id > 0);

        // Phase one alone leaves no links
        assert!(IngredientRecord::for_food(&conn, id).unwrap().is_empty());

        assert_eq!(inserted.link_ingredients(&conn, &[]).unwrap(), id);
        assert_eq!(
            IngredientRecord::for_food(&conn, id).unwrap(),
            vec![IngredientRecord::self_link(id)]
        );

        let stored = NutrientRecord::get_for_food(&conn, id).unwrap().unwrap();
        assert_eq!(stored.energy_kj, 339);
    }

    #[test]
    fn test_persist_combined_food_stores_unstored_parts_first() {
        let mut conn = setup();
        let mut arena = FoodArena::new();
        let a = arena.insert(pea());
        let mut carrot = pea();
        carrot.name = "Carrot".to_string();
        let b = arena.insert(carrot);
        let mix = arena.combine(a, b).unwrap();
        arena.get_mut(mix).unwrap().name = "Pea and carrot".to_string();

        let id = persist_food(&mut conn, &mut arena, mix).unwrap();

        assert_eq!(arena[mix].id, id);
        assert!(arena[a].is_persisted());
        assert!(arena[b].is_persisted());
        assert_eq!(
            IngredientRecord::part_ids_for(&conn, id).unwrap(),
            vec![arena[a].id, arena[b].id]
        );

        let mut loaded = FoodArena::new();
        let key = get_food_domain_by_id(&conn, &mut loaded, id).unwrap().unwrap();
        assert_eq!(loaded[key].name, "Pea and carrot");
        assert_eq!(loaded[key].weight(), 200.0);
        assert_eq!(loaded[key].nutrients.energy.kcal(), 162);
        assert_eq!(loaded.ingredients_of(key).len(), 2);
    }

    #[test]
    fn test_persist_already_stored_food_is_noop() {
        let mut conn = setup();
        let mut arena = FoodArena::new();
        let a = arena.insert(pea());

        let first = persist_food(&mut conn, &mut arena, a).unwrap();
        let second = persist_food(&mut conn, &mut arena, a).unwrap();
        assert_eq!(first, second);
        assert_eq!(FoodRecord::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_repeated_part_collapses_to_one_link() {
        let mut conn = setup();
        let mut arena = FoodArena::new();
        let a = arena.insert(pea());
        let double = arena.combine(a, a).unwrap();

        let id = persist_food(&mut conn, &mut arena, double).unwrap();
        assert_eq!(IngredientRecord::part_ids_for(&conn, id).unwrap(), vec![arena[a].id]);
    }

    #[test]
    fn test_persist_refuses_cycle() {
        let mut conn = setup();
        let mut arena = FoodArena::new();
        let a = arena.insert(pea());
        arena.get_mut(a).unwrap().add_ingredient(a);

        let result = persist_food(&mut conn, &mut arena, a);
        assert!(matches!(result, Err(DbError::Food(FoodError::CycleDetected { .. }))));
        assert_eq!(FoodRecord::count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_missing_food_is_none() {
        let conn = setup();
        let mut arena = FoodArena::new();
        assert_eq!(get_food_domain_by_id(&conn, &mut arena, 5).unwrap(), None);
        assert!(arena.is_empty());
    }
}
