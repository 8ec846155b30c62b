//! Advanced filtering example for centros-rs
//!
//! This example demonstrates filter combinations, chart ordering and
//! GeoJSON export of the map layers.

use centros_rs::prelude::*;

fn main() -> Result<()> {
    println!("=== centros-rs Advanced Filtering Example ===\n");

    let atlas = Atlas::open(AtlasConfig::default())?;

    // Example 1: Available provinces
    println!("--- Example 1: Province options ---");
    for province in atlas.province_options() {
        println!("- {province}");
    }
    println!();

    // Example 2: Public schools in Alajuela
    println!("--- Example 2: Public schools in Alajuela ---");
    let filter = FilterSet::all()
        .with_province("Alajuela")
        .with_institution_type(InstitutionType::Public);
    let summary = atlas.summary(&filter);
    println!(
        "Total: {} (public {}, private {})",
        summary.total, summary.public, summary.private
    );
    for row in atlas.aggregate(&filter).rows {
        println!(
            "  {:<20} {:>4} schools  {:>8}",
            row.name,
            row.school_count,
            row.density_schools_per_10k_pop
                .map(|d| format!("{d:.2}/10k"))
                .unwrap_or_else(|| "n/a".to_string())
        );
    }
    println!();

    // Example 3: Chart ordered by population density
    println!("--- Example 3: Top 10 cantons by population density ---");
    let order = ChartOrder::Descending(DensityMetric::PopulationPerKm2);
    if let Some(chart) = atlas.density_chart(&FilterSet::all().active_only(), order) {
        for (i, p) in chart.points.iter().take(10).enumerate() {
            println!(
                "{}. {} - {:?} inhabitants/km², {:?} schools/km²",
                i + 1,
                p.canton,
                p.population_density_per_km2.map(|v| v.round()),
                p.density_schools_per_km2.map(|v| (v * 100.0).round() / 100.0)
            );
        }
    }
    println!();

    // Example 4: Table sorted by canton, descending
    println!("--- Example 4: First rows of the private school table ---");
    let private = FilterSet::all().with_institution_type(InstitutionType::Private);
    for row in atlas
        .school_table(&private, SortKey::Canton, SortDirection::Descending)
        .iter()
        .take(5)
    {
        println!(
            "- {} | {} | {}",
            row.code,
            row.name,
            row.assigned_canton.unwrap_or("(unassigned)")
        );
    }
    println!();

    // Example 5: Map layers as GeoJSON
    println!("--- Example 5: Map export ---");
    let fc = atlas
        .map_layers(&FilterSet::all(), DensityMetric::SchoolsPerKm2)
        .to_feature_collection();
    let text = serde_json::to_string(&fc).map_err(AtlasError::from)?;
    println!("{} features, {} bytes of GeoJSON", fc.features.len(), text.len());

    Ok(())
}
