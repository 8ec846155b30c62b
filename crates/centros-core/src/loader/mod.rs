// crates/centros-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the Physical Layer (I/O, decompression, text encoding) and
//! delegates to the format readers (CSV for schools and census, GeoJSON
//! for canton polygons). Conversion into typed records lives in
//! [`crate::model::convert`].

use crate::config::{AtlasConfig, Bounds, GeometryConfig, SourcePaths};
use crate::error::Result;
use crate::model::convert::build_snapshot;
use crate::model::Snapshot;
use crate::report::LoadReport;

pub mod cantons;
pub mod common_io;
pub mod population;
pub mod schools;

impl Snapshot {
    /// Load all three datasets named in the configuration.
    pub fn load(config: &AtlasConfig) -> Result<Self> {
        Self::load_from_paths(&config.sources, &config.geometry, &config.bounds)
    }

    /// **Standard Loader:** reads schools, canton polygons and census rows.
    ///
    /// Any of the three files missing or unreadable is fatal. Everything
    /// below file level ends up in [`Snapshot::report`].
    pub fn load_from_paths(
        sources: &SourcePaths,
        geometry: &GeometryConfig,
        bounds: &Bounds,
    ) -> Result<Self> {
        tracing::info!(
            schools = %sources.schools.display(),
            cantons = %sources.cantons.display(),
            population = %sources.population.display(),
            "loading datasets"
        );
        let mut report = LoadReport::default();

        // 1. Read raw rows
        let school_rows = schools::read_schools(&sources.schools, &mut report)?;
        let canton_rows = cantons::read_cantons(&sources.cantons, geometry)?;
        let population_rows = population::read_population(&sources.population, &mut report)?;

        // 2. Validate and join census figures
        let snapshot = build_snapshot(school_rows, canton_rows, population_rows, bounds, report);
        snapshot.report.log_summary("load");
        Ok(snapshot)
    }
}
