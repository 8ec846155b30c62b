// crates/centros-core/src/aggregate.rs

//! # Aggregator
//!
//! Per-canton counts and densities for a given filter set. Runs are pure:
//! the same snapshot, join and filter always produce the same rows in the
//! same order (canton key order).

use crate::join::{Assignment, SpatialJoin};
use crate::model::{CantonId, InstitutionType, School, SchoolStatus, Snapshot};
use crate::text::fold_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Status predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
}

/// The active filter predicates. Empty sets mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Folded province names.
    pub provinces: BTreeSet<String>,
    pub institution_types: BTreeSet<InstitutionType>,
    pub status: StatusFilter,
}

impl FilterSet {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_province(mut self, province: &str) -> Self {
        let key = fold_key(province);
        if !key.is_empty() {
            self.provinces.insert(key);
        }
        self
    }

    pub fn with_institution_type(mut self, kind: InstitutionType) -> Self {
        self.institution_types.insert(kind);
        self
    }

    pub fn active_only(mut self) -> Self {
        self.status = StatusFilter::Active;
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.provinces.is_empty()
            && self.institution_types.is_empty()
            && self.status == StatusFilter::All
    }

    /// Province predicate on a display name (folded before comparing).
    pub fn matches_province(&self, province: &str) -> bool {
        self.provinces.is_empty() || self.provinces.contains(&fold_key(province))
    }

    pub fn matches_school(&self, school: &School) -> bool {
        (self.provinces.is_empty() || self.provinces.contains(&school.province_key))
            && (self.institution_types.is_empty()
                || self.institution_types.contains(&school.institution_type))
            && match self.status {
                StatusFilter::All => true,
                StatusFilter::Active => school.status == SchoolStatus::Active,
            }
    }
}

/// Sub-counts per institution type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeBreakdown {
    pub public: usize,
    pub private: usize,
}

impl TypeBreakdown {
    pub fn add(&mut self, kind: InstitutionType) {
        match kind {
            InstitutionType::Public => self.public += 1,
            InstitutionType::Private => self.private += 1,
        }
    }

    pub fn get(&self, kind: InstitutionType) -> usize {
        match kind {
            InstitutionType::Public => self.public,
            InstitutionType::Private => self.private,
        }
    }

    pub fn total(&self) -> usize {
        self.public + self.private
    }
}

/// One canton's derived figures under the active filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedCanton {
    pub id: CantonId,
    pub name: String,
    pub key: String,
    pub province: String,
    pub school_count: usize,
    pub breakdown: TypeBreakdown,
    pub area_km2: Option<f64>,
    pub population: Option<u64>,
    pub dwellings: Option<u64>,
    /// `None` when the area is missing or zero.
    pub density_schools_per_km2: Option<f64>,
    /// `None` when the population is missing or zero.
    pub density_schools_per_10k_pop: Option<f64>,
    pub population_density_per_km2: Option<f64>,
}

/// Result of one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub filter: FilterSet,
    pub rows: Vec<AggregatedCanton>,
    /// Schools passing the filter.
    pub filtered_schools: usize,
    /// Filtered schools with a valid coordinate outside every canton.
    pub unassigned: usize,
    /// Filtered schools with no usable coordinate.
    pub invalid_coordinate: usize,
}

impl Aggregation {
    pub fn row(&self, key: &str) -> Option<&AggregatedCanton> {
        let key = fold_key(key);
        self.rows.iter().find(|r| r.key == key)
    }

    pub fn total_schools(&self) -> usize {
        self.rows.iter().map(|r| r.school_count).sum()
    }
}

/// `numerator / denominator`, or `None` for a missing, zero or non-finite
/// denominator.
fn ratio(numerator: f64, denominator: Option<f64>) -> Option<f64> {
    let d = denominator?;
    if !d.is_finite() || d <= 0.0 {
        return None;
    }
    let v = numerator / d;
    v.is_finite().then_some(v)
}

/// Group filtered schools by assigned canton and compute densities.
pub fn aggregate(snapshot: &Snapshot, join: &SpatialJoin, filter: &FilterSet) -> Aggregation {
    let mut counts = vec![TypeBreakdown::default(); snapshot.cantons.len()];
    let mut filtered_schools = 0;
    let mut unassigned = 0;
    let mut invalid_coordinate = 0;

    for (i, school) in snapshot.schools.iter().enumerate() {
        if !filter.matches_school(school) {
            continue;
        }
        filtered_schools += 1;
        match join.assignment(i) {
            Assignment::Canton(id) => counts[id.index()].add(school.institution_type),
            Assignment::Unassigned => unassigned += 1,
            Assignment::InvalidCoordinate => invalid_coordinate += 1,
        }
    }

    let rows = snapshot
        .cantons
        .iter()
        .filter(|c| filter.matches_province(&c.province))
        .map(|c| {
            let breakdown = counts[c.id.index()];
            let school_count = breakdown.total();
            let population = c.population_total();
            AggregatedCanton {
                id: c.id,
                name: c.name.clone(),
                key: c.key.clone(),
                province: c.province.clone(),
                school_count,
                breakdown,
                area_km2: c.area_km2,
                population,
                dwellings: c.population.as_ref().and_then(|p| p.dwellings),
                density_schools_per_km2: ratio(school_count as f64, c.area_km2),
                density_schools_per_10k_pop: ratio(
                    school_count as f64,
                    population.map(|p| p as f64 / 10_000.0),
                ),
                population_density_per_km2: population
                    .and_then(|p| ratio(p as f64, c.area_km2)),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        cantons = rows.len(),
        filtered_schools,
        unassigned,
        invalid_coordinate,
        "aggregation complete"
    );

    Aggregation {
        filter: filter.clone(),
        rows,
        filtered_schools,
        unassigned,
        invalid_coordinate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn run(filter: &FilterSet) -> Aggregation {
        let snapshot = fixtures::snapshot();
        let join = SpatialJoin::compute(&snapshot);
        aggregate(&snapshot, &join, filter)
    }

    #[test]
    fn counts_sum_to_joined_schools() {
        let snapshot = fixtures::snapshot();
        let join = SpatialJoin::compute(&snapshot);
        let agg = aggregate(&snapshot, &join, &FilterSet::all());

        let valid = snapshot
            .schools
            .iter()
            .filter(|s| s.location.is_valid())
            .count();
        assert_eq!(agg.rows.len(), 4);
        assert_eq!(agg.total_schools() + agg.unassigned, valid);
        assert_eq!(agg.unassigned, 1);
        assert_eq!(agg.invalid_coordinate, 1);
        for row in &agg.rows {
            assert_eq!(row.breakdown.total(), row.school_count);
        }
    }

    #[test]
    fn rows_are_in_key_order() {
        let agg = run(&FilterSet::all());
        let keys: Vec<_> = agg.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["alajuela", "escazu", "grecia", "san jose"]);
    }

    #[test]
    fn zero_or_missing_population_gives_null() {
        let agg = run(&FilterSet::all());
        let escazu = agg.row("Escazú").unwrap();
        assert_eq!(escazu.population, Some(0));
        assert_eq!(escazu.density_schools_per_10k_pop, None);
        assert_eq!(escazu.population_density_per_km2, Some(0.0));
        assert!(escazu.density_schools_per_km2.is_some());

        let grecia = agg.row("grecia").unwrap();
        assert_eq!(grecia.population, None);
        assert_eq!(grecia.density_schools_per_10k_pop, None);

        let san_jose = agg.row("san jose").unwrap();
        let per_10k = san_jose.density_schools_per_10k_pop.unwrap();
        assert!((per_10k - 2.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn province_and_type_filter_restricts_rows_and_counts() {
        let filter = FilterSet::all()
            .with_province("Alajuela")
            .with_institution_type(InstitutionType::Public);
        let agg = run(&filter);

        let keys: Vec<_> = agg.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["alajuela", "grecia"]);
        let alajuela = agg.row("alajuela").unwrap();
        assert_eq!(alajuela.school_count, 2);
        assert_eq!(alajuela.breakdown.private, 0);
        assert_eq!(agg.filtered_schools, 4);
        assert_eq!(agg.invalid_coordinate, 1);
    }

    #[test]
    fn active_only_drops_closed_schools() {
        let agg = run(&FilterSet::all().active_only());
        let alajuela = agg.row("alajuela").unwrap();
        assert_eq!(alajuela.school_count, 2);
        assert_eq!(alajuela.breakdown, TypeBreakdown { public: 1, private: 1 });
    }

    #[test]
    fn repeated_runs_are_identical() {
        let filter = FilterSet::all().with_province("San José");
        let a = serde_json::to_string(&run(&filter)).unwrap();
        let b = serde_json::to_string(&run(&filter)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ratio_null_policy() {
        assert_eq!(ratio(5.0, Some(2.0)), Some(2.5));
        assert_eq!(ratio(5.0, Some(0.0)), None);
        assert_eq!(ratio(5.0, None), None);
        assert_eq!(ratio(0.0, Some(10.0)), Some(0.0));
        assert_eq!(ratio(1.0, Some(f64::NAN)), None);
    }

    #[test]
    fn filter_set_folds_provinces() {
        let f = FilterSet::all().with_province("  ALAJUELA ");
        assert!(f.matches_province("Alajuela"));
        assert!(!f.matches_province("Heredia"));
        assert!(FilterSet::all().matches_province("anything"));
        assert!(FilterSet::all().is_unrestricted());
        assert!(!f.is_unrestricted());
    }

    #[test]
    fn breakdown_total_is_sum() {
        let mut b = TypeBreakdown::default();
        b.add(InstitutionType::Public);
        b.add(InstitutionType::Public);
        b.add(InstitutionType::Private);
        assert_eq!(b.total(), 3);
        assert_eq!(b.get(InstitutionType::Public), 2);
    }
}
