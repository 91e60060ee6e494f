//! Build script for FoodDB
//!
//! Embeds the build timestamp and profile shown by the banner and the status tool.

fn main() {
    println!("cargo:rerun-if-changed=src");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    println!("cargo:rustc-env=FOODDB_BUILD_TIMESTAMP={}", timestamp);

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=FOODDB_BUILD_PROFILE={}", profile);
}
