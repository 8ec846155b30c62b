// crates/centros-core/src/config.rs
use crate::error::{AtlasError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Session configuration, read from TOML. Every field has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub sources: SourcePaths,
    pub geometry: GeometryConfig,
    pub bounds: Bounds,
    pub search: SearchConfig,
    pub map: MapConfig,
}

/// Locations of the three input datasets. A `.gz` suffix is decompressed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcePaths {
    pub schools: PathBuf,
    pub cantons: PathBuf,
    pub population: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            schools: PathBuf::from("datos/centros_educativos.csv"),
            cantons: PathBuf::from("datos/cantones.geojson"),
            population: PathBuf::from("datos/poblacion_vivienda_canton.csv"),
        }
    }
}

/// Property names read from each canton feature.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub canton_name_property: String,
    pub province_property: String,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            canton_name_property: "CANTÓN".to_string(),
            province_property: "PROVINCIA".to_string(),
        }
    }
}

/// Accepted coordinate window. Points outside are flagged invalid.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Mainland Costa Rica with a margin for the northern border at ~11.2°.
    pub const COSTA_RICA: Bounds = Bounds {
        min_lat: 8.0,
        max_lat: 11.5,
        min_lon: -86.0,
        max_lon: -82.0,
    };

    #[inline]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::COSTA_RICA
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_radius_km: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Ramer–Douglas–Peucker tolerance in degrees; `0` keeps full detail.
    pub simplify_tolerance_deg: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            simplify_tolerance_deg: 0.002,
        }
    }
}

impl AtlasConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AtlasError::NotFound(format!("Config not found at {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}
