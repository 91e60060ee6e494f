//! Utility to seed the database with a few sample foods
//!
//! Stores Pea, Peach and Potato, then a combination of the first two and a
//! half portion of that combination.

use fooddb::models::{persist_food, to_string_list, Food, FoodArena, FOOD_COLUMNS, UNPERSISTED_ID};
use fooddb::nutrition::{Carbohydrates, Energy, Fat, Nutrients, Protein, Salt};
use tracing_subscriber::EnvFilter;

fn sample_foods() -> Vec<Food> {
    vec![
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
        ),
        Food::new(
            UNPERSISTED_ID,
            "Peach",
            150.0,
            Nutrients::new(
                Energy::from_kcal(200.0),
                Fat::new(1.0, 2.0),
                Carbohydrates::new(30.0, 5.0),
                Protein::new(2.0),
                Salt::new(0.2),
            ),
            "An orange fruit that is not an orange.",
        ),
        Food::new(
            UNPERSISTED_ID,
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
        ),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(fooddb::config::DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let db_path = fooddb::config::database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    println!("Database: {}", db_path.display());

    let database = fooddb::db::Database::new(&db_path)?;
    let mut conn = database.get_conn()?;
    fooddb::db::migrations::run_migrations(&conn)?;

    let mut arena = FoodArena::new();
    let keys: Vec<_> = sample_foods().into_iter().map(|food| arena.insert(food)).collect();
    for &key in &keys {
        persist_food(&mut conn, &mut arena, key)?;
    }

    let mix = arena.combine(keys[0], keys[1])?;
    if let Some(food) = arena.get_mut(mix) {
        food.name = "Pea and peach".to_string();
        food.description = "Pea + Peach.".to_string();
    }
    persist_food(&mut conn, &mut arena, mix)?;

    let half = arena.scale(mix, 0.5)?;
    if let Some(food) = arena.get_mut(half) {
        food.id = UNPERSISTED_ID;
        food.name = "Half pea and peach".to_string();
    }
    persist_food(&mut conn, &mut arena, half)?;

    println!("{}", FOOD_COLUMNS.join(" | "));
    for key in keys.into_iter().chain([mix, half]) {
        println!("{}", to_string_list(&arena, key)?.join(" | "));
    }

    Ok(())
}
