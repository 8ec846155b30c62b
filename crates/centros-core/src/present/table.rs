// crates/centros-core/src/present/table.rs
use crate::aggregate::FilterSet;
use crate::join::{Assignment, SpatialJoin};
use crate::model::{InstitutionType, Location, School, SchoolStatus, Snapshot};
use crate::text::fold_key;
use serde::Serialize;

/// Sortable table columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    Code,
    InstitutionType,
    Province,
    /// The spatially assigned canton, not the `CANTON` column.
    Canton,
    District,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One row of the school table.
///
/// Schools excluded from the join (invalid coordinate, unassigned) are
/// still listed, with `assigned_canton` empty.
#[derive(Debug, Clone, Serialize)]
pub struct SchoolRow<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub institution_type: InstitutionType,
    pub status: SchoolStatus,
    pub province: &'a str,
    pub canton: &'a str,
    pub district: &'a str,
    pub assigned_canton: Option<&'a str>,
    pub assignment: Assignment,
    pub location: Location,
}

impl SchoolRow<'_> {
    fn sort_text(&self, key: SortKey) -> String {
        match key {
            SortKey::Name => fold_key(self.name),
            SortKey::Code => self.code.to_owned(),
            SortKey::InstitutionType => self.institution_type.label().to_owned(),
            SortKey::Province => fold_key(self.province),
            SortKey::Canton => self.assigned_canton.map(fold_key).unwrap_or_default(),
            SortKey::District => fold_key(self.district),
        }
    }
}

/// Filtered, sorted school rows. Ties fall back to ascending code.
pub fn school_table<'a>(
    snapshot: &'a Snapshot,
    join: &SpatialJoin,
    filter: &FilterSet,
    sort: SortKey,
    direction: SortDirection,
) -> Vec<SchoolRow<'a>> {
    let mut rows: Vec<(String, SchoolRow<'a>)> = snapshot
        .schools
        .iter()
        .enumerate()
        .filter(|(_, s)| filter.matches_school(s))
        .map(|(i, school)| {
            let row = row_for(snapshot, school, join.assignment(i));
            (row.sort_text(sort), row)
        })
        .collect();

    rows.sort_by(|(ka, a), (kb, b)| {
        let primary = match direction {
            SortDirection::Ascending => ka.cmp(kb),
            SortDirection::Descending => kb.cmp(ka),
        };
        primary.then_with(|| a.code.cmp(b.code))
    });
    rows.into_iter().map(|(_, row)| row).collect()
}

fn row_for<'a>(snapshot: &'a Snapshot, school: &'a School, assignment: Assignment) -> SchoolRow<'a> {
    SchoolRow {
        code: &school.code,
        name: &school.name,
        institution_type: school.institution_type,
        status: school.status,
        province: school.province(),
        canton: school.canton(),
        district: school.district(),
        assigned_canton: assignment.canton().map(|id| snapshot.canton(id).name.as_str()),
        assignment,
        location: school.location,
    }
}
