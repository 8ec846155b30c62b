//! Basic usage example for centros-rs
//!
//! This example demonstrates how to:
//! - Load the three datasets into an `Atlas`
//! - Inspect load statistics and data-quality warnings
//! - Aggregate schools per canton
//! - Search schools by name and by location
//!
//! Usage: `cargo run --example basic_usage -- [config.toml]`

use centros_rs::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("=== centros-rs Basic Usage Example ===\n");

    let config = match std::env::args().nth(1) {
        Some(path) => AtlasConfig::load_from_file(path)?,
        None => AtlasConfig::default(),
    };

    println!("Loading datasets...");
    let atlas = Atlas::open(config)?;
    let stats = atlas.stats();
    println!("✓ Loaded {} schools ({} with a usable location)", stats.schools, stats.schools_with_location);
    println!("✓ Loaded {} cantons, {} census rows\n", stats.cantons, stats.population_records);

    // Example 1: Data-quality summary
    println!("--- Example 1: Warnings by category ---");
    for (category, count) in atlas.warning_counts() {
        println!("  {category}: {count}");
    }
    println!();

    // Example 2: Top cantons by schools per km²
    println!("--- Example 2: Densest cantons ---");
    let agg = atlas.aggregate(&FilterSet::all());
    let mut rows: Vec<_> = agg
        .rows
        .iter()
        .filter(|r| r.density_schools_per_km2.is_some())
        .collect();
    rows.sort_by(|a, b| {
        b.density_schools_per_km2
            .unwrap_or(0.0)
            .total_cmp(&a.density_schools_per_km2.unwrap_or(0.0))
    });
    for (i, row) in rows.iter().take(5).enumerate() {
        println!(
            "{}. {} ({}) - {} schools, {:.2} per km²",
            i + 1,
            row.name,
            row.province,
            row.school_count,
            row.density_schools_per_km2.unwrap_or(0.0)
        );
    }
    println!(
        "Unassigned: {}, invalid coordinate: {}\n",
        agg.unassigned, agg.invalid_coordinate
    );

    // Example 3: Name search
    println!("--- Example 3: Schools named 'Liceo' ---");
    let hits = atlas.search_by_name("liceo", &FilterSet::all());
    println!("Found {} schools", hits.len());
    for hit in hits.iter().take(5) {
        println!("- {} ({})", hit.school.name(), hit.school.code());
    }
    println!();

    // Example 4: Nearest school to the National Theatre
    println!("--- Example 4: Nearest school to 9.9335, -84.0770 ---");
    for hit in atlas.search_by_location(9.9335, -84.0770, None, &FilterSet::all()) {
        println!("- {} at {:.2} km", hit.school.name(), hit.distance_km);
    }

    Ok(())
}
