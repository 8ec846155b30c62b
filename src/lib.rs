//! centros-rs
//! ==========
//!
//! Facade over [`centros_core`]: Costa Rica's educational centers joined to
//! canton polygons and census figures, aggregated into density metrics.
//!
//! ```no_run
//! use centros_rs::prelude::*;
//!
//! let atlas = Atlas::open(AtlasConfig::default())?;
//! let agg = atlas.aggregate(&FilterSet::all().with_province("Alajuela"));
//! for row in &agg.rows {
//!     println!("{}: {} schools", row.name, row.school_count);
//! }
//! # Ok::<(), centros_rs::AtlasError>(())
//! ```

pub use centros_core::*;

pub mod prelude {
    pub use centros_core::aggregate::{AggregatedCanton, Aggregation, FilterSet, StatusFilter};
    pub use centros_core::present::{
        ChartOrder, DensityMetric, SortDirection, SortKey, Summary,
    };
    pub use centros_core::{
        Atlas, AtlasConfig, AtlasError, DataWarning, InstitutionType, NameMatch, Result,
        School, Snapshot,
    };
}
