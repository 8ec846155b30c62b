//! centros-cli
//! ===========
//!
//! Command-line interface for the `centros-core` school density pipeline.
//!
//! This crate primarily provides a binary (`centros`). The library target
//! only exists so that the overview below renders as documentation.
//!
//! Quick start
//! -----------
//!
//! ```text
//! centros stats
//! centros --province Alajuela --tipo publico cantons
//! centros chart --order schools-per-10k
//! centros map --out mapa.geojson
//! centros search liceo
//! centros near 9.9335 -84.0770 --radius-km 2
//! ```
//!
//! For programmatic access use [`centros-core`] directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
