// crates/centros-core/src/present/chart.rs
use super::DensityMetric;
use crate::aggregate::{AggregatedCanton, Aggregation};
use serde::Serialize;
use std::cmp::Ordering;

/// Ordering of chart categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "by", content = "metric", rename_all = "snake_case")]
pub enum ChartOrder {
    /// Alphabetical by normalized canton key.
    #[default]
    Canton,
    /// Highest value first; cantons without a value go last.
    Descending(DensityMetric),
}

/// One canton's pair of bars: school density against population density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub canton: String,
    pub key: String,
    pub province: String,
    pub school_count: usize,
    pub density_schools_per_km2: Option<f64>,
    pub density_schools_per_10k_pop: Option<f64>,
    pub population_density_per_km2: Option<f64>,
}

impl From<&AggregatedCanton> for ChartPoint {
    fn from(row: &AggregatedCanton) -> Self {
        Self {
            canton: row.name.clone(),
            key: row.key.clone(),
            province: row.province.clone(),
            school_count: row.school_count,
            density_schools_per_km2: row.density_schools_per_km2,
            density_schools_per_10k_pop: row.density_schools_per_10k_pop,
            population_density_per_km2: row.population_density_per_km2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityChart {
    pub order: ChartOrder,
    pub points: Vec<ChartPoint>,
}

/// Comparative density chart over the aggregated cantons.
///
/// Returns `None` when fewer than two cantons remain: there is nothing
/// to compare.
pub fn density_chart(aggregation: &Aggregation, order: ChartOrder) -> Option<DensityChart> {
    if aggregation.rows.len() < 2 {
        return None;
    }

    let mut rows: Vec<&AggregatedCanton> = aggregation.rows.iter().collect();
    match order {
        ChartOrder::Canton => rows.sort_by(|a, b| a.key.cmp(&b.key)),
        ChartOrder::Descending(metric) => rows.sort_by(|a, b| {
            descending_nulls_last(metric.value(a), metric.value(b))
                .then_with(|| a.key.cmp(&b.key))
        }),
    }

    Some(DensityChart {
        order,
        points: rows.into_iter().map(ChartPoint::from).collect(),
    })
}

fn descending_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
