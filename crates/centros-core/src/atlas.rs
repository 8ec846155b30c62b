// crates/centros-core/src/atlas.rs

//! The session object.
//!
//! An [`Atlas`] owns one immutable [`Snapshot`] and the [`SpatialJoin`]
//! computed from it. Every query (filter change, search) borrows the atlas
//! and returns a fresh derived view; nothing inside is ever mutated.

use crate::aggregate::{aggregate, Aggregation, FilterSet};
use crate::config::AtlasConfig;
use crate::error::Result;
use crate::join::{Assignment, SpatialJoin};
use crate::model::{Canton, DbStats, Snapshot};
use crate::present::{
    density_chart, map_layers, province_options, school_table, summarize, ChartOrder,
    DensityChart, DensityMetric, MapLayers, SchoolRow, SortDirection, SortKey, Summary,
};
use crate::report::DataWarning;
use crate::search::{search_by_location, search_by_name, DistanceHit, NameHit};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Atlas {
    config: AtlasConfig,
    snapshot: Snapshot,
    join: SpatialJoin,
}

impl Atlas {
    /// Load the configured sources and run the spatial join.
    pub fn open(config: AtlasConfig) -> Result<Self> {
        let snapshot = Snapshot::load(&config)?;
        Ok(Self::from_snapshot(snapshot, config))
    }

    /// Wrap an already loaded snapshot.
    pub fn from_snapshot(snapshot: Snapshot, config: AtlasConfig) -> Self {
        let join = SpatialJoin::compute(&snapshot);
        Self {
            config,
            snapshot,
            join,
        }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn join(&self) -> &SpatialJoin {
        &self.join
    }

    pub fn stats(&self) -> DbStats {
        let mut stats = self.snapshot.stats();
        stats.warnings += self.join.report.len();
        stats
    }

    /// Load-time warnings followed by join warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &DataWarning> {
        self.snapshot
            .report
            .warnings
            .iter()
            .chain(self.join.report.warnings.iter())
    }

    pub fn warning_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = self.snapshot.report.counts();
        for (category, n) in self.join.report.counts() {
            *counts.entry(category).or_insert(0) += n;
        }
        counts
    }

    /// The canton a school was spatially assigned to.
    pub fn assigned_canton(&self, code: &str) -> Option<&Canton> {
        match self.join.get(code)? {
            Assignment::Canton(id) => Some(self.snapshot.canton(id)),
            Assignment::Unassigned | Assignment::InvalidCoordinate => None,
        }
    }

    pub fn aggregate(&self, filter: &FilterSet) -> Aggregation {
        aggregate(&self.snapshot, &self.join, filter)
    }

    pub fn summary(&self, filter: &FilterSet) -> Summary {
        summarize(&self.snapshot.schools, filter)
    }

    pub fn province_options(&self) -> Vec<String> {
        province_options(&self.snapshot.schools)
    }

    pub fn school_table(
        &self,
        filter: &FilterSet,
        sort: SortKey,
        direction: SortDirection,
    ) -> Vec<SchoolRow<'_>> {
        school_table(&self.snapshot, &self.join, filter, sort, direction)
    }

    pub fn density_chart(&self, filter: &FilterSet, order: ChartOrder) -> Option<DensityChart> {
        density_chart(&self.aggregate(filter), order)
    }

    /// Map layers with outlines simplified by `[map] simplify_tolerance_deg`.
    pub fn map_layers(&self, filter: &FilterSet, metric: DensityMetric) -> MapLayers<'_> {
        let aggregation = self.aggregate(filter);
        map_layers(
            &self.snapshot,
            &aggregation,
            filter,
            metric,
            self.config.map.simplify_tolerance_deg,
        )
    }

    /// Name search restricted to schools passing `filter`.
    pub fn search_by_name(&self, query: &str, filter: &FilterSet) -> Vec<NameHit<'_>> {
        search_by_name(
            self.snapshot.schools.iter().filter(|s| filter.matches_school(s)),
            query,
        )
    }

    /// Location search restricted to schools passing `filter`.
    pub fn search_by_location(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
        filter: &FilterSet,
    ) -> Vec<DistanceHit<'_>> {
        search_by_location(
            self.snapshot.schools.iter().filter(|s| filter.matches_school(s)),
            latitude,
            longitude,
            radius_km,
        )
    }
}
