//! FoodDB Status Tool
//!
//! Provides runtime status information about the food database service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::migrations::{get_schema_version, needs_migration};
use crate::db::Database;
use crate::models::FoodRecord;

/// Food composition instructions for AI assistants
pub const FOOD_INSTRUCTIONS: &str = r#"
# FoodDB Instructions

This guide explains how to record and compose foods with the FoodDB tools.

## Overview

A **food** has a name, a weight in grams, nutrients for that weight and an
optional description. A food can be made of other foods (its ingredients).

Nutrients are always given for the whole weight of the food, not per 100 g.

## Rounding

- Energy is stored in whole kcal and kJ, rounded up. 1 kcal = 4.184 kJ.
- Weight, fat, carbohydrates, protein and salt are rounded up to 2 decimals.

## Adding a Food

```
add_food(
  name: "Pea",
  weight: 100,
  kcal: 81,
  fat_total: 0.4,
  fat_saturated: 0.1,
  carbs_total: 14,
  carbs_sugar: 6,
  protein: 5,
  salt: 0.05,
  description: "Green little balls."
)
```

Give either `kcal` or `kj`. When both are given, `kcal` wins and `kj` is
derived from it.

To record a food made of stored foods, pass their ids in `ingredient_ids`.

## Composing Foods

- `combine_foods(first_id, second_id)` adds weights and nutrients together.
  The result contains both foods, or the ingredients of both when they have any.
- `scale_food(id, factor)` multiplies weight and nutrients by `factor`.

Both return a preview. Pass `save: true` to store the result as a new food.

## Quick Reference

| Task | Tool |
|------|------|
| Service status | `fooddb_status` |
| List all foods as table rows | `list_foods` |
| Food details | `get_food` |
| Add a food | `add_food` |
| Combine two foods | `combine_foods` |
| Scale a food | `scale_food` |
| Read a table row | `parse_food_row` |
"#;

/// Runtime status of the food database service
#[derive(Debug, Clone, Serialize)]
pub struct FoodDbStatus {
    /// Build information
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,
    pub needs_migration: Option<bool>,
    pub food_count: Option<i64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status.
    ///
    /// Database figures are `None` when the database cannot be queried.
    pub fn get_status(&self, database: &Database) -> FoodDbStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let (schema_version, needs_migration, food_count) = match database.get_conn() {
            Ok(conn) => (
                get_schema_version(&conn).ok(),
                needs_migration(&conn).ok(),
                FoodRecord::count(&conn).ok(),
            ),
            Err(e) => {
                tracing::warn!("Status could not reach the database: {}", e);
                (None, None, None)
            }
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FoodDbStatus {
            version: build_info.version,
            build_timestamp: build_info.build_timestamp,
            build_profile: build_info.build_profile,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            needs_migration,
            food_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_status_reports_database_state() {
        let db = Database::open_in_memory().unwrap();
        let tracker = StatusTracker::new(PathBuf::from(":memory:"));

        let before = tracker.get_status(&db);
        assert_eq!(before.needs_migration, Some(true));
        assert_eq!(before.database_size_bytes, None);

        db.with_conn(run_migrations).unwrap();
        let after = tracker.get_status(&db);
        assert_eq!(after.needs_migration, Some(false));
        assert_eq!(after.food_count, Some(0));
        assert_eq!(after.process_id, std::process::id());
        assert_eq!(after.version, crate::build_info::VERSION);
    }
}
