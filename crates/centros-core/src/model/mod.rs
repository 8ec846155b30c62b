// crates/centros-core/src/model/mod.rs
pub mod convert;
pub mod domain;

pub use domain::{
    Canton, CantonId, CoordinateIssue, DbStats, InstitutionType, Location, PopulationRecord,
    School, SchoolStatus, Snapshot,
};
