// crates/centros-core/src/present/mod.rs

//! # Presentation Adapter
//!
//! Shapes the snapshot, the join and an [`Aggregation`](crate::aggregate::Aggregation)
//! into the row structures a dashboard consumes: a school table, a density
//! chart, map layers and a few summary widgets. Nothing here renders.

use crate::aggregate::{AggregatedCanton, FilterSet};
use crate::model::{InstitutionType, School};
use crate::text::fold_key;
use serde::Serialize;
use std::collections::BTreeMap;

pub mod chart;
pub mod map;
pub mod table;

pub use chart::{density_chart, ChartOrder, ChartPoint, DensityChart};
pub use map::{map_layers, marker_color, ChoroplethCell, MapLayers, MapPoint};
pub use table::{school_table, SchoolRow, SortDirection, SortKey};

/// A per-canton value usable for chart ordering and choropleth shading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityMetric {
    #[default]
    SchoolsPerKm2,
    SchoolsPer10kPop,
    PopulationPerKm2,
}

impl DensityMetric {
    pub fn value(self, row: &AggregatedCanton) -> Option<f64> {
        match self {
            DensityMetric::SchoolsPerKm2 => row.density_schools_per_km2,
            DensityMetric::SchoolsPer10kPop => row.density_schools_per_10k_pop,
            DensityMetric::PopulationPerKm2 => row.population_density_per_km2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DensityMetric::SchoolsPerKm2 => "schools per km²",
            DensityMetric::SchoolsPer10kPop => "schools per 10,000 inhabitants",
            DensityMetric::PopulationPerKm2 => "inhabitants per km²",
        }
    }
}

/// Headline counts for the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub public: usize,
    pub private: usize,
    pub with_location: usize,
}

pub fn summarize<'a>(schools: impl IntoIterator<Item = &'a School>, filter: &FilterSet) -> Summary {
    let mut summary = Summary::default();
    for school in schools.into_iter().filter(|s| filter.matches_school(s)) {
        summary.total += 1;
        match school.institution_type {
            InstitutionType::Public => summary.public += 1,
            InstitutionType::Private => summary.private += 1,
        }
        if school.location.is_valid() {
            summary.with_location += 1;
        }
    }
    summary
}

/// Distinct non-empty school provinces, sorted by folded name.
///
/// Spelling variants of the same province collapse to the first one seen.
pub fn province_options<'a>(schools: impl IntoIterator<Item = &'a School>) -> Vec<String> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for school in schools {
        let name = school.province().trim();
        if name.is_empty() {
            continue;
        }
        seen.entry(fold_key(name)).or_insert_with(|| name.to_owned());
    }
    seen.into_values().collect()
}
