//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- FOODS
        -- One row per food, simple or composite
        -- ============================================
        CREATE TABLE foods (
            food_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            weight REAL NOT NULL DEFAULT 0,      -- grams
            description TEXT NOT NULL DEFAULT '' CHECK(length(description) <= 10000)
        );

        CREATE INDEX idx_foods_name ON foods(name);

        -- ============================================
        -- NUTRIENTS
        -- Exactly one row per food, for the food's stated weight
        -- ============================================
        CREATE TABLE nutrients (
            food_id INTEGER PRIMARY KEY REFERENCES foods(food_id) ON DELETE CASCADE,
            energy_kcal INTEGER NOT NULL DEFAULT 0,
            energy_kj INTEGER NOT NULL DEFAULT 0,
            fat_total REAL NOT NULL DEFAULT 0,       -- grams
            fat_saturated REAL NOT NULL DEFAULT 0,   -- grams
            carbs_total REAL NOT NULL DEFAULT 0,     -- grams
            carbs_sugar REAL NOT NULL DEFAULT 0,     -- grams
            protein_total REAL NOT NULL DEFAULT 0,   -- grams
            salt_total REAL NOT NULL DEFAULT 0       -- grams
        );

        -- ============================================
        -- INGREDIENTS
        -- Junction table: which foods a composite food is made of.
        -- Every food also links to itself.
        -- ============================================
        CREATE TABLE ingredients (
            food_id_complete INTEGER NOT NULL REFERENCES foods(food_id) ON DELETE CASCADE,
            food_id_part INTEGER NOT NULL REFERENCES foods(food_id) ON DELETE RESTRICT,
            PRIMARY KEY (food_id_complete, food_id_part)
        );

        CREATE INDEX idx_ingredients_part ON ingredients(food_id_part);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
