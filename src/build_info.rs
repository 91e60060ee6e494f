//! Build information
//!
//! Package metadata plus the timestamp and profile recorded by `build.rs`.

use serde::Serialize;

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("FOODDB_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Cargo profile the binary was built with
pub const BUILD_PROFILE: &str = match option_env!("FOODDB_BUILD_PROFILE") {
    Some(s) => s,
    None => "unknown",
};

/// Build information reported by the status tool
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: VERSION,
            build_timestamp: BUILD_TIMESTAMP,
            build_profile: BUILD_PROFILE,
        }
    }

    /// Startup banner lines
    pub fn banner(&self) -> String {
        format!(
            "Food Database ({}) v{}\nBuilt {} ({})",
            self.name, self.version, self.build_timestamp, self.build_profile
        )
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    eprintln!("{}", BuildInfo::current().banner());
}
