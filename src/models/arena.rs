//! Food arena
//!
//! Owns every in-memory food of one operation. Composition and scaling create
//! new entries and link ingredients by [`FoodKey`].

use std::collections::{HashMap, HashSet};

use super::food::{Food, FoodError, FoodKey, UNPERSISTED_ID};

/// Arena of foods addressed by [`FoodKey`]
#[derive(Debug, Clone, Default)]
pub struct FoodArena {
    foods: Vec<Food>,
}

impl FoodArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a food and return its key
    pub fn insert(&mut self, food: Food) -> FoodKey {
        self.foods.push(food);
        FoodKey(self.foods.len() - 1)
    }

    pub fn get(&self, key: FoodKey) -> Option<&Food> {
        self.foods.get(key.0)
    }

    pub fn get_mut(&mut self, key: FoodKey) -> Option<&mut Food> {
        self.foods.get_mut(key.0)
    }

    fn require(&self, key: FoodKey) -> Result<&Food, FoodError> {
        self.get(key).ok_or(FoodError::UnknownFood(key))
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Keys of all foods, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = FoodKey> {
        (0..self.foods.len()).map(FoodKey)
    }

    /// First stored food with the given id
    pub fn find_by_id(&self, id: i64) -> Option<FoodKey> {
        if id == UNPERSISTED_ID {
            return None;
        }
        self.foods.iter().position(|f| f.id == id).map(FoodKey)
    }

    /// Ingredients of a food, resolved
    pub fn ingredients_of(&self, key: FoodKey) -> Vec<&Food> {
        self.get(key)
            .map(|food| food.ingredients.iter().filter_map(|k| self.get(*k)).collect())
            .unwrap_or_default()
    }

    /// Check if making `part` an ingredient of `composite` would create a circular reference
    pub fn would_create_cycle(&self, composite: FoodKey, part: FoodKey) -> bool {
        // A cycle appears if composite is reachable from part
        let mut visited = HashSet::new();
        let mut to_check = vec![part];

        while let Some(current) = to_check.pop() {
            if current == composite {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(food) = self.get(current) {
                to_check.extend(food.ingredients.iter().copied());
            }
        }

        false
    }

    /// Append `part` to the ingredients of `composite`, refusing circular references
    pub fn add_ingredient(&mut self, composite: FoodKey, part: FoodKey) -> Result<(), FoodError> {
        self.require(part)?;
        if self.would_create_cycle(composite, part) {
            return Err(FoodError::CycleDetected { composite, part });
        }
        self.get_mut(composite)
            .ok_or(FoodError::UnknownFood(composite))?
            .add_ingredient(part);
        Ok(())
    }

    /// Remove the first ingredient of `composite` whose food id is `id`.
    /// Returns whether one was found.
    pub fn remove_ingredient(&mut self, composite: FoodKey, id: i64) -> bool {
        let position = match self.get(composite) {
            Some(food) => food
                .ingredients
                .iter()
                .position(|k| self.get(*k).is_some_and(|f| f.id == id)),
            None => None,
        };

        match (position, self.get_mut(composite)) {
            (Some(index), Some(food)) => {
                food.ingredients.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Combine two foods into a new, unstored food.
    ///
    /// Weight and nutrients are summed and the ingredient lists merged without
    /// repeats. When neither food lists ingredients, the two foods themselves
    /// become the ingredients of the result.
    pub fn combine(&mut self, a: FoodKey, b: FoodKey) -> Result<FoodKey, FoodError> {
        let first = self.require(a)?;
        let second = self.require(b)?;

        let name = if first.name.is_empty() {
            second.name.clone()
        } else {
            first.name.clone()
        };

        let mut seen = HashSet::new();
        let mut ingredients: Vec<FoodKey> = first
            .ingredients
            .iter()
            .chain(second.ingredients.iter())
            .copied()
            .filter(|k| seen.insert(*k))
            .collect();

        if ingredients.is_empty() {
            ingredients = vec![a, b];
        }

        let combined = Food::with_ingredients(
            UNPERSISTED_ID,
            name,
            first.weight() + second.weight(),
            first.nutrients.add(&second.nutrients),
            String::new(),
            ingredients,
        );

        Ok(self.insert(combined))
    }

    /// Scale a food, and every ingredient below it, by a factor.
    ///
    /// The scaled copies are new arena entries keeping their id, name and
    /// description. An ingredient reached several times is scaled once.
    pub fn scale(&mut self, key: FoodKey, factor: f64) -> Result<FoodKey, FoodError> {
        let mut scaled = HashMap::new();
        let mut in_progress = HashSet::new();
        self.scale_inner(key, factor, &mut scaled, &mut in_progress)
    }

    fn scale_inner(
        &mut self,
        key: FoodKey,
        factor: f64,
        scaled: &mut HashMap<FoodKey, FoodKey>,
        in_progress: &mut HashSet<FoodKey>,
    ) -> Result<FoodKey, FoodError> {
        if let Some(done) = scaled.get(&key) {
            return Ok(*done);
        }
        if !in_progress.insert(key) {
            return Err(FoodError::CycleDetected { composite: key, part: key });
        }

        let ingredients = self.require(key)?.ingredients.clone();
        let mut scaled_ingredients = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            scaled_ingredients.push(self.scale_inner(ingredient, factor, scaled, in_progress)?);
        }

        let food = self.require(key)?;
        let copy = Food::with_ingredients(
            food.id,
            food.name.clone(),
            food.weight() * factor,
            food.nutrients.scale(factor),
            food.description.clone(),
            scaled_ingredients,
        );

        let new_key = self.insert(copy);
        in_progress.remove(&key);
        scaled.insert(key, new_key);
        Ok(new_key)
    }
}

impl std::ops::Index<FoodKey> for FoodArena {
    type Output = Food;

    fn index(&self, key: FoodKey) -> &Food {
        &self.foods[key.0]
    }
}
