use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for centros
#[derive(Debug, Parser)]
#[command(
    name = "centros",
    version,
    about = "Educational centers of Costa Rica per canton: counts, densities, maps and search"
)]
pub struct CliArgs {
    /// TOML configuration file (sources, bounds, search radius, map tolerance)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Schools CSV (overrides [sources] schools)
    #[arg(long = "schools", global = true)]
    pub schools: Option<PathBuf>,

    /// Canton polygons as GeoJSON (overrides [sources] cantons)
    #[arg(long = "cantons", global = true)]
    pub cantons: Option<PathBuf>,

    /// Population-by-canton CSV (overrides [sources] population)
    #[arg(long = "population", global = true)]
    pub population: Option<PathBuf>,

    /// Restrict to a province; repeat for several (e.g. --province Alajuela --province Heredia)
    #[arg(short = 'p', long = "province", global = true)]
    pub provinces: Vec<String>,

    /// Restrict to one institution type
    #[arg(short = 't', long = "tipo", value_enum, global = true)]
    pub tipo: Option<Tipo>,

    /// Only schools whose status is active
    #[arg(long = "active-only", global = true)]
    pub active_only: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Tipo {
    Publico,
    Privado,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortColumn {
    Name,
    Code,
    Tipo,
    Province,
    Canton,
    District,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Metric {
    SchoolsPerKm2,
    #[value(name = "schools-per-10k")]
    SchoolsPer10k,
    PopulationPerKm2,
}

/// Chart ordering: by canton name, or descending by a metric.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Order {
    Canton,
    SchoolsPerKm2,
    #[value(name = "schools-per-10k")]
    SchoolsPer10k,
    PopulationPerKm2,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show dataset sizes, headline counts and data-quality warnings
    Stats,

    /// List schools passing the filter
    Schools {
        /// Sort column
        #[arg(long, value_enum, default_value_t = SortColumn::Name)]
        sort: SortColumn,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Print at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Per-canton counts and densities
    Cantons {
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },

    /// School density vs. population density per canton
    Chart {
        #[arg(long, value_enum, default_value_t = Order::Canton)]
        order: Order,
    },

    /// Write school points and the canton choropleth as GeoJSON
    Map {
        /// Output file
        #[arg(short = 'o', long = "out")]
        out: PathBuf,
        /// Choropleth metric
        #[arg(long, value_enum, default_value_t = Metric::SchoolsPerKm2)]
        metric: Metric,
    },

    /// Search schools by name (accent- and case-insensitive substring)
    Search {
        /// Substring to search
        query: String,
    },

    /// Schools near a coordinate
    Near {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in km (default from [search] default_radius_km)
        #[arg(long = "radius-km")]
        radius_km: Option<f64>,
        /// Only return the single nearest school
        #[arg(long, conflicts_with = "radius_km")]
        nearest: bool,
    },
}
