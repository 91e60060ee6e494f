//! Flat string-list format
//!
//! One food as an ordered row of strings, as shown in tabular listings:
//!
//! | # | field |
//! |---|-------|
//! | 0 | id |
//! | 1 | name |
//! | 2 | weight (g) |
//! | 3 | energy kcal |
//! | 4 | energy kJ |
//! | 5 | fat total |
//! | 6 | fat saturated |
//! | 7 | carbohydrates total |
//! | 8 | sugar |
//! | 9 | protein |
//! | 10 | salt |
//! | 11 | description |
//! | 12 | `Contains: a,b` or `Contains: Nothing else` |

use std::str::FromStr;

use super::arena::FoodArena;
use super::food::{Food, FoodError, FoodKey};
use crate::nutrition::rounding::ceil_tolerant;
use crate::nutrition::{Carbohydrates, Energy, Fat, Nutrients, Protein, Salt};

/// Fields required by [`from_string_list`]; the trailing "Contains" field is optional
pub const MIN_FIELDS: usize = 12;

/// Column headings, in row order
pub const FOOD_COLUMNS: [&str; 13] = [
    "ID",
    "Name",
    "Weight",
    "Kcal",
    "kJ",
    "Fat",
    "Saturated Fat",
    "Carbs",
    "Sugars",
    "Protein",
    "Salt",
    "Description",
    "Contains",
];

const CONTAINS_PREFIX: &str = "Contains: ";
const CONTAINS_NOTHING: &str = "Contains: Nothing else";

/// Serialize a food from the arena into a row of strings
pub fn to_string_list(arena: &FoodArena, key: FoodKey) -> Result<Vec<String>, FoodError> {
    let food = arena.get(key).ok_or(FoodError::UnknownFood(key))?;
    let n = &food.nutrients;

    let names: Vec<&str> = arena
        .ingredients_of(key)
        .into_iter()
        .map(|f| f.name.as_str())
        .collect();
    let contains = if names.is_empty() {
        CONTAINS_NOTHING.to_string()
    } else {
        format!("{}{}", CONTAINS_PREFIX, names.join(","))
    };

    Ok(vec![
        food.id.to_string(),
        food.name.clone(),
        food.weight().to_string(),
        n.energy.kcal().to_string(),
        n.energy.kj().to_string(),
        n.fat.total().to_string(),
        n.fat.saturated().to_string(),
        n.carbohydrates.total().to_string(),
        n.carbohydrates.sugar().to_string(),
        n.protein.total().to_string(),
        n.salt.total().to_string(),
        food.description.clone(),
        contains,
    ])
}

fn parse_field<T: FromStr>(fields: &[impl AsRef<str>], index: usize, field: &'static str) -> Result<T, FoodError> {
    let value = fields[index].as_ref().trim();
    value.parse().map_err(|_| FoodError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Parse a row of strings back into a food.
///
/// Energy keeps both the kcal and the kJ field, each rounded up to a whole
/// unit. Ingredients are not reconstructed.
pub fn from_string_list(fields: &[impl AsRef<str>]) -> Result<Food, FoodError> {
    if fields.len() < MIN_FIELDS {
        return Err(FoodError::NotEnoughFields {
            expected: MIN_FIELDS,
            found: fields.len(),
        });
    }

    let id: i64 = parse_field(fields, 0, "id")?;
    let weight: f64 = parse_field(fields, 2, "weight")?;
    let kcal: f64 = parse_field(fields, 3, "kcal")?;
    let kj: f64 = parse_field(fields, 4, "kJ")?;

    let nutrients = Nutrients::new(
        Energy::from_parts(ceil_tolerant(kcal) as i64, ceil_tolerant(kj) as i64),
        Fat::new(
            parse_field(fields, 5, "fat total")?,
            parse_field(fields, 6, "fat saturated")?,
        ),
        Carbohydrates::new(
            parse_field(fields, 7, "carbohydrates total")?,
            parse_field(fields, 8, "sugar")?,
        ),
        Protein::new(parse_field(fields, 9, "protein")?),
        Salt::new(parse_field(fields, 10, "salt")?),
    );

    Ok(Food::new(
        id,
        fields[1].as_ref(),
        weight,
        nutrients,
        fields[11].as_ref(),
    ))
}

/// Multi-line description of a food and its ingredient names
pub fn to_readable_string(arena: &FoodArena, key: FoodKey) -> Result<String, FoodError> {
    let food = arena.get(key).ok_or(FoodError::UnknownFood(key))?;

    let mut text = format!(
        "ID: {}\nName: {}\nWeight: {}\nNutrients: {}Description: {}\n",
        food.id,
        food.name,
        food.weight(),
        food.nutrients,
        food.description
    );

    let names: Vec<&str> = arena
        .ingredients_of(key)
        .into_iter()
        .map(|f| f.name.as_str())
        .collect();
    if !names.is_empty() {
        text.push_str(CONTAINS_PREFIX);
        text.push('\n');
        text.push_str(&names.join("\n"));
        text.push('\n');
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pea() -> Food {
        Food::new(
            4,
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
    fn test_to_string_list_field_order() {
        let mut arena = FoodArena::new();
        let key = arena.insert(pea());

        let row = to_string_list(&arena, key).unwrap();
        assert_eq!(
            row,
            vec![
                "4", "Pea", "100", "81", "339", "0.4", "0.1", "14", "6", "5", "0.05",
                "Green little balls.", "Contains: Nothing else",
            ]
        );
        assert_eq!(row.len(), FOOD_COLUMNS.len());
    }

    #[test]
    fn test_contains_lists_ingredient_names() {
        let mut arena = FoodArena::new();
        let a = arena.insert(pea());
        let mut carrot = pea();
        carrot.id = 5;
        carrot.name = "Carrot".to_string();
        let b = arena.insert(carrot);
        let mix = arena.combine(a, b).unwrap();

        let row = to_string_list(&arena, mix).unwrap();
        assert_eq!(row[0], "-1");
        assert_eq!(row[2], "200");
        assert_eq!(row[12], "Contains: Pea,Carrot");
    }

    #[test]
    fn test_round_trip_keeps_values() {
        let mut arena = FoodArena::new();
        let original = Food::new(
            9,
            "Potato",
            100.0,
            Nutrients::new(
                Energy::from_kcal(313.0),
                Fat::new(0.1, 0.02),
                Carbohydrates::new(23.2, 0.5),
                Protein::new(3.1),
                Salt::new(0.004),
            ),
            "Root vegetable",
        );
        let key = arena.insert(original.clone());

        let row = to_string_list(&arena, key).unwrap();
        let parsed = from_string_list(&row).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_from_string_list_requires_twelve_fields() {
        let short = vec!["1", "Pea", "100"];
        assert_eq!(
            from_string_list(&short),
            Err(FoodError::NotEnoughFields { expected: 12, found: 3 })
        );
    }

    #[test]
    fn test_from_string_list_without_contains_field() {
        let row = [
            "7", "Peach", "150", "200", "837", "1", "2", "30", "5", "2", "0.2",
            "An orange fruit that is not an orange.",
        ];
        let food = from_string_list(&row).unwrap();
        assert_eq!(food.id, 7);
        assert_eq!(food.name, "Peach");
        assert_eq!(food.weight(), 150.0);
        assert_eq!(food.nutrients.energy.kcal(), 200);
        assert_eq!(food.nutrients.energy.kj(), 837);
        assert_eq!(food.nutrients.fat.saturated(), 2.0);
        assert_eq!(food.nutrients.carbohydrates.sugar(), 5.0);
        assert!(food.ingredients.is_empty());
    }

    #[test]
    fn test_from_string_list_keeps_kj_field() {
        let row = [
            "2", "Broth", "250", "240", "1000", "0", "0", "1", "0", "2", "1.5", "",
        ];
        let food = from_string_list(&row).unwrap();
        assert_eq!(food.nutrients.energy.kcal(), 240);
        assert_eq!(food.nutrients.energy.kj(), 1000);
    }

    #[test]
    fn test_from_string_list_rejects_bad_numbers() {
        let mut arena = FoodArena::new();
        let key = arena.insert(pea());
        let mut row = to_string_list(&arena, key).unwrap();
        row[5] = "lots".to_string();

        assert_eq!(
            from_string_list(&row),
            Err(FoodError::InvalidNumber { field: "fat total", value: "lots".to_string() })
        );
    }

    #[test]
    fn test_readable_string() {
        let mut arena = FoodArena::new();
        let a = arena.insert(pea());
        let b = arena.insert(pea());
        let mix = arena.combine(a, b).unwrap();

        let text = to_readable_string(&arena, mix).unwrap();
        assert!(text.starts_with("ID: -1\nName: Pea\nWeight: 200\n"));
        assert!(text.contains("Energy: 162 kcal (678 kJ)\n"));
        assert!(text.ends_with("Contains: \nPea\nPea\n"));
    }
}
