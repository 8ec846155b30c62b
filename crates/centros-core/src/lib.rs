// crates/centros-core/src/lib.rs

pub mod aggregate; // Per-canton counts and densities
pub mod atlas; // Session object
pub mod config;
pub mod error;
pub mod join; // Point-in-canton assignment
pub mod loader;
pub mod model;
pub mod present; // Table / chart / map shaping
pub mod report;
pub mod search;
pub mod text;
pub mod traits;
// Raw serde rows, shared by the loaders and converters
#[doc(hidden)]
pub mod raw;

#[cfg(test)]
mod fixtures;

// Re-exports
pub use crate::aggregate::{aggregate, AggregatedCanton, Aggregation, FilterSet, StatusFilter};
pub use crate::atlas::Atlas;
pub use crate::config::{AtlasConfig, Bounds};
pub use crate::error::{AtlasError, Result};
pub use crate::join::{Assignment, CantonLocator, PointMatch, SpatialJoin};
pub use crate::model::{
    Canton, CantonId, DbStats, InstitutionType, Location, PopulationRecord, School,
    SchoolStatus, Snapshot,
};
pub use crate::report::{DataWarning, LoadReport};
// Export Text Utils
pub use crate::text::{equals_folded, fold_key};
pub use crate::traits::NameMatch;
