// crates/centros-core/src/raw.rs
use serde::Deserialize;

/// Raw school row as it comes from `centros_educativos.csv`.
///
/// Every field is optional text: validation happens in
/// [`crate::model::convert`] so a bad cell costs one row, not the file.
/// NOTE: Column names mirror the Ministry of Public Education export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchoolRaw {
    #[serde(rename = "CODSABER", default)]
    pub code: Option<String>,
    #[serde(rename = "CENTRO_EDU", default)]
    pub name: Option<String>,
    #[serde(rename = "TIPO_INSTI", default)]
    pub institution_type: Option<String>,
    #[serde(rename = "ESTADO", default)]
    pub status: Option<String>,
    #[serde(rename = "REGIONAL", default)]
    pub region: Option<String>,
    #[serde(rename = "CIRCUITO", default)]
    pub circuit: Option<String>,
    #[serde(rename = "PROVINCIA", default)]
    pub province: Option<String>,
    #[serde(rename = "CANTON", alias = "CANTÓN", default)]
    pub canton: Option<String>,
    #[serde(rename = "DISTRITO", default)]
    pub district: Option<String>,
    #[serde(rename = "POBLADO", default)]
    pub locality: Option<String>,
    #[serde(rename = "DIRECCION", alias = "DIRECCIÓN", default)]
    pub address: Option<String>,
    #[serde(rename = "LATITUD", default)]
    pub latitude: Option<String>,
    #[serde(rename = "LONGITUD", default)]
    pub longitude: Option<String>,
}

/// Raw census row from `poblacion_vivienda_canton.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PopulationRaw {
    #[serde(rename = "CANTÓN", alias = "CANTON", default)]
    pub canton: Option<String>,
    #[serde(rename = "PROVINCIA", default)]
    pub province: Option<String>,
    #[serde(rename = "POBLACION TOTAL", alias = "POBLACIÓN TOTAL", default)]
    pub population: Option<String>,
    #[serde(rename = "TOTAL VIVIENDAS", alias = "VIVIENDAS", default)]
    pub dwellings: Option<String>,
}

/// Raw canton feature: properties already pulled out of the GeoJSON.
#[derive(Debug, Clone)]
pub struct CantonRaw {
    pub name: Option<String>,
    pub province: Option<String>,
    pub geometry: Option<geojson::Geometry>,
}

/// Field names of [`SchoolRaw`]; folded-equal headers are rewritten to these.
pub const SCHOOL_COLUMNS: &[&str] = &[
    "CODSABER",
    "CENTRO_EDU",
    "TIPO_INSTI",
    "ESTADO",
    "REGIONAL",
    "CIRCUITO",
    "PROVINCIA",
    "CANTON",
    "DISTRITO",
    "POBLADO",
    "DIRECCION",
    "LATITUD",
    "LONGITUD",
];

/// Field names of [`PopulationRaw`].
pub const POPULATION_COLUMNS: &[&str] = &[
    "CANTÓN",
    "PROVINCIA",
    "POBLACION TOTAL",
    "TOTAL VIVIENDAS",
    "VIVIENDAS",
];

/// Header names the loader insists on.
pub const SCHOOL_REQUIRED_COLUMNS: &[&str] = &["CODSABER", "CENTRO_EDU", "TIPO_INSTI"];
pub const SCHOOL_COORDINATE_COLUMNS: &[&str] = &["LATITUD", "LONGITUD"];
pub const POPULATION_NAME_COLUMNS: &[&str] = &["CANTÓN", "CANTON"];
pub const POPULATION_TOTAL_COLUMNS: &[&str] = &["POBLACION TOTAL", "POBLACIÓN TOTAL"];
