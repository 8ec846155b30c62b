// crates/centros-core/src/model/domain.rs
use crate::report::LoadReport;
use crate::text::fold_key;
use crate::traits::NameMatch;
use geo::{MultiPolygon, Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public or private administration of an educational center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionType {
    Public,
    Private,
}

impl InstitutionType {
    pub const ALL: [InstitutionType; 2] = [InstitutionType::Public, InstitutionType::Private];

    /// Parses `TIPO_INSTI` values such as `PÚBLICO`, `Pública`, `PRIVADO`.
    ///
    /// Matching is on the folded prefix, so gendered and accented variants
    /// all resolve. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let k = fold_key(s);
        if k.starts_with("publ") || k == "public" {
            Some(InstitutionType::Public)
        } else if k.starts_with("priv") {
            Some(InstitutionType::Private)
        } else {
            None
        }
    }

    /// Display label as used in the source data.
    pub fn label(self) -> &'static str {
        match self {
            InstitutionType::Public => "PÚBLICO",
            InstitutionType::Private => "PRIVADO",
        }
    }
}

impl fmt::Display for InstitutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operating status of an educational center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchoolStatus {
    Active,
    Closed,
}

impl SchoolStatus {
    /// `ESTADO` is optional in the export; blank means active.
    pub fn parse(s: Option<&str>) -> Self {
        let k = s.map(fold_key).unwrap_or_default();
        if k.starts_with("cerr") || k.starts_with("inact") || k.starts_with("clos") {
            SchoolStatus::Closed
        } else {
            SchoolStatus::Active
        }
    }
}

/// Why a school's coordinate was kept out of the spatial join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateIssue {
    Missing,
    OutOfBounds,
}

/// A school's location: either a usable WGS84 point or the reason it is not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Location {
    Valid {
        latitude: f64,
        longitude: f64,
    },
    /// The parsed values (if any) are kept for display.
    Invalid {
        latitude: Option<f64>,
        longitude: Option<f64>,
        issue: CoordinateIssue,
    },
}

impl Location {
    /// `geo` point (x = longitude, y = latitude) when valid.
    pub fn point(&self) -> Option<Point<f64>> {
        match *self {
            Location::Valid {
                latitude,
                longitude,
            } => Some(Point::new(longitude, latitude)),
            Location::Invalid { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Location::Valid { .. })
    }

    pub fn latitude(&self) -> Option<f64> {
        match *self {
            Location::Valid { latitude, .. } => Some(latitude),
            Location::Invalid { latitude, .. } => latitude,
        }
    }

    pub fn longitude(&self) -> Option<f64> {
        match *self {
            Location::Valid { longitude, .. } => Some(longitude),
            Location::Invalid { longitude, .. } => longitude,
        }
    }
}

/// One educational center. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct School {
    /// `CODSABER`
    pub code: String,
    pub name: String,
    pub institution_type: InstitutionType,
    pub status: SchoolStatus,
    pub region: Option<String>,
    pub circuit: Option<String>,
    pub province: Option<String>,
    /// Canton as written in the schools table (not the spatial assignment).
    pub canton: Option<String>,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub address: Option<String>,
    pub location: Location,
    /// Folded `province`, precomputed for filtering.
    #[serde(skip)]
    pub province_key: String,
}

impl School {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn province(&self) -> &str {
        self.province.as_deref().unwrap_or("")
    }

    pub fn canton(&self) -> &str {
        self.canton.as_deref().unwrap_or("")
    }

    pub fn district(&self) -> &str {
        self.district.as_deref().unwrap_or("")
    }

    pub fn point(&self) -> Option<Point<f64>> {
        self.location.point()
    }
}

impl NameMatch for School {
    fn name_str(&self) -> &str {
        &self.name
    }
}

/// Index of a canton inside [`Snapshot::cantons`].
///
/// Cantons are stored sorted by normalized key, so comparing ids compares
/// keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CantonId(pub u16);

impl CantonId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One of the 82 second-level administrative divisions.
#[derive(Debug, Clone, PartialEq)]
pub struct Canton {
    pub id: CantonId,
    pub name: String,
    /// Normalized join key (see [`fold_key`]).
    pub key: String,
    pub province: String,
    pub geometry: MultiPolygon<f64>,
    pub bbox: Rect<f64>,
    /// Geodesic area; `None` when degenerate (zero).
    pub area_km2: Option<f64>,
    /// Census figures joined by key, if a row matched.
    pub population: Option<PopulationRecord>,
}

impl Canton {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn area_km2(&self) -> Option<f64> {
        self.area_km2
    }

    pub fn population_total(&self) -> Option<u64> {
        self.population.as_ref().and_then(|p| p.population)
    }
}

impl NameMatch for Canton {
    fn name_str(&self) -> &str {
        &self.name
    }
}

/// Census totals for one canton.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationRecord {
    pub canton: String,
    pub key: String,
    pub population: Option<u64>,
    pub dwellings: Option<u64>,
}

/// Aggregate statistics for the loaded snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DbStats {
    pub schools: usize,
    pub schools_with_location: usize,
    pub cantons: usize,
    pub population_records: usize,
    pub warnings: usize,
}

/// The three validated datasets, loaded once and then only read.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub schools: Vec<School>,
    /// Sorted by `key`; `cantons[i].id == CantonId(i)`.
    pub cantons: Vec<Canton>,
    pub population: Vec<PopulationRecord>,
    pub report: LoadReport,
}

impl Snapshot {
    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn cantons(&self) -> &[Canton] {
        &self.cantons
    }

    pub fn canton(&self, id: CantonId) -> &Canton {
        &self.cantons[id.index()]
    }

    /// Find a canton by name, accent- and case-insensitive.
    pub fn find_canton(&self, name: &str) -> Option<&Canton> {
        let key = fold_key(name);
        self.cantons
            .binary_search_by(|c| c.key.as_str().cmp(key.as_str()))
            .ok()
            .map(|i| &self.cantons[i])
    }

    pub fn find_school(&self, code: &str) -> Option<&School> {
        let code = code.trim();
        self.schools.iter().find(|s| s.code == code)
    }

    pub fn stats(&self) -> DbStats {
        DbStats {
            schools: self.schools.len(),
            schools_with_location: self
                .schools
                .iter()
                .filter(|s| s.location.is_valid())
                .count(),
            cantons: self.cantons.len(),
            population_records: self.population.len(),
            warnings: self.report.len(),
        }
    }
}
