// crates/centros-core/src/present/map.rs
use super::DensityMetric;
use crate::aggregate::{Aggregation, FilterSet};
use crate::model::{CantonId, InstitutionType, School, Snapshot};
use geo::{MultiPolygon, Simplify};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;

pub const PUBLIC_COLOR: &str = "#3388ff";
pub const PRIVATE_COLOR: &str = "#ff6b6b";

pub fn marker_color(kind: InstitutionType) -> &'static str {
    match kind {
        InstitutionType::Public => PUBLIC_COLOR,
        InstitutionType::Private => PRIVATE_COLOR,
    }
}

/// One marker. Only schools with a valid coordinate get one.
#[derive(Debug, Clone, Serialize)]
pub struct MapPoint<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub institution_type: InstitutionType,
    pub color: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl<'a> MapPoint<'a> {
    fn from_school(school: &'a School) -> Option<Self> {
        let point = school.point()?;
        Some(Self {
            code: &school.code,
            name: &school.name,
            institution_type: school.institution_type,
            color: marker_color(school.institution_type),
            latitude: point.y(),
            longitude: point.x(),
        })
    }
}

/// One shaded canton polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethCell {
    pub id: CantonId,
    pub name: String,
    pub key: String,
    pub province: String,
    pub school_count: usize,
    /// `None` renders as "no data".
    pub value: Option<f64>,
    pub geometry: MultiPolygon<f64>,
}

#[derive(Debug, Clone)]
pub struct MapLayers<'a> {
    pub metric: DensityMetric,
    pub points: Vec<MapPoint<'a>>,
    pub choropleth: Vec<ChoroplethCell>,
}

/// Build the point and choropleth layers for the active filter.
///
/// `tolerance_deg` is the Ramer–Douglas–Peucker epsilon applied to canton
/// outlines; `0.0` keeps full detail.
pub fn map_layers<'a>(
    snapshot: &'a Snapshot,
    aggregation: &Aggregation,
    filter: &FilterSet,
    metric: DensityMetric,
    tolerance_deg: f64,
) -> MapLayers<'a> {
    let points = snapshot
        .schools
        .iter()
        .filter(|s| filter.matches_school(s))
        .filter_map(MapPoint::from_school)
        .collect();

    let choropleth = aggregation
        .rows
        .iter()
        .map(|row| {
            let canton = snapshot.canton(row.id);
            let geometry = if tolerance_deg > 0.0 {
                canton.geometry.simplify(&tolerance_deg)
            } else {
                canton.geometry.clone()
            };
            ChoroplethCell {
                id: row.id,
                name: row.name.clone(),
                key: row.key.clone(),
                province: row.province.clone(),
                school_count: row.school_count,
                value: metric.value(row),
                geometry,
            }
        })
        .collect();

    MapLayers {
        metric,
        points,
        choropleth,
    }
}

impl MapLayers<'_> {
    /// Both layers as one GeoJSON FeatureCollection: canton polygons first
    /// (property `layer = "choropleth"`), then school points
    /// (`layer = "schools"`).
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut features = Vec::with_capacity(self.choropleth.len() + self.points.len());

        for cell in &self.choropleth {
            features.push(feature(
                Id::String(cell.key.clone()),
                Geometry::new(Value::from(&cell.geometry)),
                json!({
                    "layer": "choropleth",
                    "canton": cell.name,
                    "province": cell.province,
                    "school_count": cell.school_count,
                    "metric": self.metric,
                    "value": cell.value,
                }),
            ));
        }

        for p in &self.points {
            features.push(feature(
                Id::String(p.code.to_owned()),
                Geometry::new(Value::Point(vec![p.longitude, p.latitude])),
                json!({
                    "layer": "schools",
                    "name": p.name,
                    "institution_type": p.institution_type,
                    "color": p.color,
                }),
            ));
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn feature(id: Id, geometry: Geometry, properties: serde_json::Value) -> Feature {
    let properties: Option<JsonObject> = match properties {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    };
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: Some(id),
        properties,
        foreign_members: None,
    }
}
