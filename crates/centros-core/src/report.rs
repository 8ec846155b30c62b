// crates/centros-core/src/report.rs

//! Data-quality reporting.
//!
//! Nothing in the pipeline drops a record silently: every rejected row,
//! excluded coordinate, unmatched join key and ambiguous spatial match is
//! recorded here and surfaced to the caller next to the results.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Which input a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Schools,
    Cantons,
    Population,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Schools => "schools",
            SourceKind::Cantons => "cantons",
            SourceKind::Population => "population",
        })
    }
}

/// A single non-fatal data-quality finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// A row could not be decoded at all (wrong field count, bad quoting).
    MalformedRow {
        source: SourceKind,
        line: u64,
        reason: String,
    },
    /// A row or feature without its identifier (`CODSABER` / canton name).
    MissingIdentifier { source: SourceKind, line: u64 },
    /// A second school with an already seen `CODSABER`; the first one wins.
    DuplicateIdentifier { code: String, line: u64 },
    /// `TIPO_INSTI` is neither public nor private.
    UnknownInstitutionType { code: String, value: String },
    /// Missing, unparsable or out-of-bounds coordinate. The school stays in
    /// listings but takes no part in the spatial join.
    InvalidCoordinate {
        code: String,
        latitude: Option<f64>,
        longitude: Option<f64>,
    },
    /// Feature without usable polygon geometry.
    MalformedGeometry { feature: u64, reason: String },
    /// Several features folded to the same canton key and were merged.
    DuplicateCanton { key: String },
    /// Canton without a census row; its per-capita densities are null.
    UnmatchedPopulation { canton: String },
    /// Census row whose canton matches no polygon.
    OrphanPopulation { canton: String },
    /// Census row with a missing or unparsable population total.
    MissingPopulation { canton: String },
    /// Census row whose canton key repeats an earlier row; the first is kept.
    DuplicatePopulation { canton: String, line: u64 },
    /// A valid coordinate that fell inside no canton polygon.
    Unassigned { code: String },
    /// A coordinate matched several cantons (shared edge or overlapping
    /// polygons); `chosen` is the smallest normalized key.
    AmbiguousMatch {
        code: String,
        candidates: Vec<String>,
        chosen: String,
        on_boundary: bool,
    },
}

impl DataWarning {
    /// Stable category label, used for grouped summaries.
    pub fn category(&self) -> &'static str {
        match self {
            DataWarning::MalformedRow { .. } => "malformed_row",
            DataWarning::MissingIdentifier { .. } => "missing_identifier",
            DataWarning::DuplicateIdentifier { .. } => "duplicate_identifier",
            DataWarning::UnknownInstitutionType { .. } => "unknown_institution_type",
            DataWarning::InvalidCoordinate { .. } => "invalid_coordinate",
            DataWarning::MalformedGeometry { .. } => "malformed_geometry",
            DataWarning::DuplicateCanton { .. } => "duplicate_canton",
            DataWarning::UnmatchedPopulation { .. } => "unmatched_population",
            DataWarning::OrphanPopulation { .. } => "orphan_population",
            DataWarning::MissingPopulation { .. } => "missing_population",
            DataWarning::DuplicatePopulation { .. } => "duplicate_population",
            DataWarning::Unassigned { .. } => "unassigned",
            DataWarning::AmbiguousMatch { .. } => "ambiguous_match",
        }
    }
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::MalformedRow {
                source,
                line,
                reason,
            } => write!(f, "{source}: malformed row at line {line}: {reason}"),
            DataWarning::MissingIdentifier { source, line } => {
                write!(f, "{source}: missing identifier at line {line}")
            }
            DataWarning::DuplicateIdentifier { code, line } => {
                write!(f, "schools: duplicate CODSABER {code} at line {line}")
            }
            DataWarning::UnknownInstitutionType { code, value } => {
                write!(f, "schools: {code} has unknown institution type {value:?}")
            }
            DataWarning::InvalidCoordinate {
                code,
                latitude,
                longitude,
            } => write!(
                f,
                "schools: {code} has invalid coordinate ({latitude:?}, {longitude:?})"
            ),
            DataWarning::MalformedGeometry { feature, reason } => {
                write!(f, "cantons: feature {feature} has malformed geometry: {reason}")
            }
            DataWarning::DuplicateCanton { key } => {
                write!(f, "cantons: duplicate canton {key:?}, polygons merged")
            }
            DataWarning::UnmatchedPopulation { canton } => {
                write!(f, "population: no census row for canton {canton:?}")
            }
            DataWarning::OrphanPopulation { canton } => {
                write!(f, "population: census row {canton:?} matches no canton")
            }
            DataWarning::MissingPopulation { canton } => {
                write!(f, "population: no usable total for {canton:?}")
            }
            DataWarning::DuplicatePopulation { canton, line } => write!(
                f,
                "population: duplicate census row {canton:?} at line {line}, first one kept"
            ),
            DataWarning::Unassigned { code } => {
                write!(f, "join: {code} lies outside every canton")
            }
            DataWarning::AmbiguousMatch {
                code,
                candidates,
                chosen,
                on_boundary,
            } => write!(
                f,
                "join: {code} matched {candidates:?}{}, assigned to {chosen:?}",
                if *on_boundary { " on a shared edge" } else { "" }
            ),
        }
    }
}

/// Ordered collection of warnings with grouped counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub warnings: Vec<DataWarning>,
}

impl LoadReport {
    pub fn push(&mut self, warning: DataWarning) {
        tracing::debug!(%warning, "data warning");
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, other: LoadReport) {
        self.warnings.extend(other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Number of warnings per category, sorted by category name.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut out = BTreeMap::new();
        for w in &self.warnings {
            *out.entry(w.category()).or_insert(0) += 1;
        }
        out
    }

    pub fn count(&self, category: &str) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.category() == category)
            .count()
    }

    /// Emit one `warn!` line per category.
    pub fn log_summary(&self, stage: &str) {
        for (category, count) in self.counts() {
            tracing::warn!(stage, category, count, "data-quality warnings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_group_by_category() {
        let mut report = LoadReport::default();
        report.push(DataWarning::Unassigned { code: "1".into() });
        report.push(DataWarning::Unassigned { code: "2".into() });
        report.push(DataWarning::DuplicateCanton { key: "dota".into() });

        let counts = report.counts();
        assert_eq!(counts.get("unassigned"), Some(&2));
        assert_eq!(counts.get("duplicate_canton"), Some(&1));
        assert_eq!(report.count("ambiguous_match"), 0);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn display_mentions_the_record() {
        let w = DataWarning::AmbiguousMatch {
            code: "4521".into(),
            candidates: vec!["escazu".into(), "san jose".into()],
            chosen: "escazu".into(),
            on_boundary: true,
        };
        let text = w.to_string();
        assert!(text.contains("4521"));
        assert!(text.contains("shared edge"));
    }
}
