//! Error handling example for centros-rs
//!
//! This example demonstrates fatal errors versus data-quality warnings.

use centros_rs::prelude::*;
use centros_rs::config::SourcePaths;

fn main() -> Result<()> {
    println!("=== centros-rs Error Handling Example ===\n");

    // Example 1: A missing source file is the one fatal condition
    println!("--- Example 1: Loading from a path that does not exist ---");
    let mut config = AtlasConfig::default();
    config.sources = SourcePaths {
        schools: "does/not/exist.csv".into(),
        ..SourcePaths::default()
    };
    match Atlas::open(config) {
        Ok(_) => println!("  unexpectedly loaded"),
        Err(AtlasError::NotFound(msg)) => println!("  ✗ {msg}"),
        Err(e) => println!("  ✗ other error: {e}"),
    }
    println!();

    // Example 2: A broken config file
    println!("--- Example 2: Malformed configuration ---");
    match AtlasConfig::from_toml_str("[bounds\nmin_lat = ") {
        Ok(_) => println!("  unexpectedly parsed"),
        Err(e) => println!("  ✗ {e}"),
    }
    println!();

    let atlas = match Atlas::open(AtlasConfig::default()) {
        Ok(atlas) => atlas,
        Err(e) => {
            eprintln!("✗ Failed to load datasets: {e}");
            return Err(e);
        }
    };

    // Example 3: Row-level problems are warnings, never errors
    println!("--- Example 3: First data-quality warnings ---");
    for warning in atlas.warnings().take(10) {
        println!("  [{}] {warning}", warning.category());
    }
    println!();

    // Example 4: Unknown lookups return None
    println!("--- Example 4: Lookups that miss ---");
    for code in ["", "0000", "XYZ"] {
        match atlas.assigned_canton(code) {
            Some(canton) => println!("  {code}: {}", canton.name()),
            None => println!("  {code:?}: no canton"),
        }
    }
    for name in ["Atlantis", "San Jose"] {
        match atlas.snapshot().find_canton(name) {
            Some(canton) => println!("  {name}: {:?} km²", canton.area_km2().map(|a| a.round())),
            None => println!("  {name}: not a canton"),
        }
    }

    Ok(())
}
