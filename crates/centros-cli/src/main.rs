//! centros — Command-line interface for centros-core
//!
//! Loads the schools table, the canton polygons and the census table,
//! joins schools to cantons and prints the derived views.
//!
//! Usage examples
//! --------------
//!
//! - Dataset sizes and data-quality warnings
//!   $ centros stats
//!
//! - Per-canton densities for public schools in Alajuela
//!   $ centros --province Alajuela --tipo publico cantons
//!   $ centros --province Alajuela cantons --json
//!
//! - Chart data ordered by schools per 10,000 inhabitants
//!   $ centros chart --order schools-per-10k
//!
//! - School table sorted by assigned canton
//!   $ centros schools --sort canton --limit 20
//!
//! - Search
//!   $ centros search liceo
//!   $ centros near 9.9335 -84.0770 --radius-km 2
//!
//! Data source
//! -----------
//!
//! Paths come from `--config <file.toml>` (section `[sources]`) and can be
//! overridden one by one with `--schools`, `--cantons`, `--population`.
//! Any path ending in `.gz` is decompressed on the fly. Set `RUST_LOG=debug`
//! to see every individual data-quality warning.
mod args;

use crate::args::{CliArgs, Commands, Metric, Order, SortColumn, Tipo};
use anyhow::Context;
use centros_core::aggregate::FilterSet;
use centros_core::present::{ChartOrder, DensityMetric, SortDirection, SortKey};
use centros_core::{Atlas, AtlasConfig, DbStats, InstitutionType};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Config file first, then per-path overrides
    let mut config = match &args.config {
        Some(path) => AtlasConfig::load_from_file(path)?,
        None => AtlasConfig::default(),
    };
    if let Some(p) = args.schools.clone() {
        config.sources.schools = p;
    }
    if let Some(p) = args.cantons.clone() {
        config.sources.cantons = p;
    }
    if let Some(p) = args.population.clone() {
        config.sources.population = p;
    }

    let filter = build_filter(&args);
    let atlas = Atlas::open(config).context("loading datasets")?;
    let stats = atlas.stats();
    log_loaded(&stats);

    match args.command {
        Commands::Stats => {
            let summary = atlas.summary(&filter);
            println!("Dataset statistics:");
            println!("  Schools: {}", stats.schools);
            println!("  With usable location: {}", stats.schools_with_location);
            println!("  Cantons: {}", stats.cantons);
            println!("  Census rows: {}", stats.population_records);
            println!("Active filter:");
            println!("  Total: {}", summary.total);
            println!("  Public: {}", summary.public);
            println!("  Private: {}", summary.private);
            println!("Warnings: {}", stats.warnings);
            for (category, count) in atlas.warning_counts() {
                println!("  {category}: {count}");
            }
        }

        Commands::Schools { sort, desc, limit } => {
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let rows = atlas.school_table(&filter, sort_key(sort), direction);
            let shown = limit.unwrap_or(rows.len());
            for row in rows.iter().take(shown) {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    row.code,
                    row.name,
                    row.institution_type,
                    row.province,
                    row.assigned_canton.unwrap_or("-"),
                );
            }
            if shown < rows.len() {
                println!("... and {} more", rows.len() - shown);
            }
        }

        Commands::Cantons { json } => {
            let agg = atlas.aggregate(&filter);
            if json {
                println!("{}", serde_json::to_string_pretty(&agg)?);
            } else {
                println!(
                    "{:<24} {:<12} {:>7} {:>7} {:>7} {:>10} {:>10}",
                    "canton", "province", "schools", "public", "private", "per km²", "per 10k"
                );
                for row in &agg.rows {
                    println!(
                        "{:<24} {:<12} {:>7} {:>7} {:>7} {:>10} {:>10}",
                        row.name,
                        row.province,
                        row.school_count,
                        row.breakdown.public,
                        row.breakdown.private,
                        fmt_opt(row.density_schools_per_km2),
                        fmt_opt(row.density_schools_per_10k_pop),
                    );
                }
                println!(
                    "Unassigned: {}  Invalid coordinate: {}",
                    agg.unassigned, agg.invalid_coordinate
                );
            }
        }

        Commands::Chart { order } => match atlas.density_chart(&filter, chart_order(order)) {
            Some(chart) => {
                for p in &chart.points {
                    println!(
                        "{}\t{}\t{}\t{}",
                        p.canton,
                        fmt_opt(p.density_schools_per_km2),
                        fmt_opt(p.density_schools_per_10k_pop),
                        fmt_opt(p.population_density_per_km2),
                    );
                }
            }
            None => eprintln!("Not enough cantons for a comparison with this filter"),
        },

        Commands::Map { out, metric } => {
            let layers = atlas.map_layers(&filter, density_metric(metric));
            let fc = layers.to_feature_collection();
            std::fs::write(&out, serde_json::to_string(&fc)?)
                .with_context(|| format!("writing {}", out.display()))?;
            tracing::debug!(path = %out.display(), "map layers written");
            println!(
                "Wrote {} cantons and {} schools to {}",
                layers.choropleth.len(),
                layers.points.len(),
                out.display()
            );
        }

        Commands::Search { query } => {
            let hits = atlas.search_by_name(&query, &filter);
            if hits.is_empty() {
                println!("No schools found matching: {query}");
            } else {
                for hit in hits {
                    println!("{} — {} ({})", hit.school.code, hit.school.name, hit.school.province());
                }
            }
        }

        Commands::Near {
            lat,
            lon,
            radius_km,
            nearest,
        } => {
            let radius = if nearest {
                None
            } else {
                Some(radius_km.unwrap_or(atlas.config().search.default_radius_km))
            };
            let hits = atlas.search_by_location(lat, lon, radius, &filter);
            if hits.is_empty() {
                println!("No schools found near {lat}, {lon}");
            }
            for hit in hits {
                println!("{:.3} km\t{}\t{}", hit.distance_km, hit.school.code, hit.school.name);
            }
        }
    }

    Ok(())
}

fn log_loaded(stats: &DbStats) {
    tracing::info!(
        schools = stats.schools,
        cantons = stats.cantons,
        census_rows = stats.population_records,
        warnings = stats.warnings,
        "datasets loaded"
    );
}

fn build_filter(args: &CliArgs) -> FilterSet {
    let mut filter = args
        .provinces
        .iter()
        .fold(FilterSet::all(), |f, p| f.with_province(p));
    if let Some(tipo) = args.tipo {
        filter = filter.with_institution_type(match tipo {
            Tipo::Publico => InstitutionType::Public,
            Tipo::Privado => InstitutionType::Private,
        });
    }
    if args.active_only {
        filter = filter.active_only();
    }
    filter
}

fn sort_key(column: SortColumn) -> SortKey {
    match column {
        SortColumn::Name => SortKey::Name,
        SortColumn::Code => SortKey::Code,
        SortColumn::Tipo => SortKey::InstitutionType,
        SortColumn::Province => SortKey::Province,
        SortColumn::Canton => SortKey::Canton,
        SortColumn::District => SortKey::District,
    }
}

fn density_metric(metric: Metric) -> DensityMetric {
    match metric {
        Metric::SchoolsPerKm2 => DensityMetric::SchoolsPerKm2,
        Metric::SchoolsPer10k => DensityMetric::SchoolsPer10kPop,
        Metric::PopulationPerKm2 => DensityMetric::PopulationPerKm2,
    }
}

fn chart_order(order: Order) -> ChartOrder {
    match order {
        Order::Canton => ChartOrder::Canton,
        Order::SchoolsPerKm2 => ChartOrder::Descending(DensityMetric::SchoolsPerKm2),
        Order::SchoolsPer10k => ChartOrder::Descending(DensityMetric::SchoolsPer10kPop),
        Order::PopulationPerKm2 => ChartOrder::Descending(DensityMetric::PopulationPerKm2),
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.3}")).unwrap_or_else(|| "null".to_string())
}
