// crates/centros-core/src/error.rs

//! Fatal errors.
//!
//! Only conditions that stop a session from starting live here: a source
//! file that cannot be opened or parsed at the container level. Row-level
//! problems are collected as [`crate::report::DataWarning`] instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("column `{column}` missing from {source_name}")]
    MissingColumn {
        source_name: &'static str,
        column: String,
    },

    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
