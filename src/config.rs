//! Runtime configuration
//!
//! Settings come from environment variables, with defaults relative to the
//! project directory.

use std::path::{Path, PathBuf};

/// Environment variable overriding the database location
pub const DATABASE_PATH_ENV: &str = "FOODDB_DATABASE_PATH";

/// Default tracing directive
pub const DEFAULT_LOG_DIRECTIVE: &str = "fooddb=info";

const DATA_DIR: &str = "data";
const DATABASE_FILE: &str = "fooddb.db";

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));
            default_database_path(&exe_dir)
        })
}

/// `data/fooddb.db` under the project root, found from the executable's directory
pub fn default_database_path(exe_dir: &Path) -> PathBuf {
    let mut path = exe_dir.to_path_buf();

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(Path::parent) {
            path = grandparent.to_path_buf();
        }
    }

    path.push(DATA_DIR);
    path.push(DATABASE_FILE);
    path
}
