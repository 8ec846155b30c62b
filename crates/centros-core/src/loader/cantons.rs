// crates/centros-core/src/loader/cantons.rs
use super::common_io;
use crate::config::GeometryConfig;
use crate::error::{AtlasError, Result};
use crate::raw::CantonRaw;
use crate::text::equals_folded;
use geojson::{Feature, GeoJson};
use std::path::Path;

/// Read the canton polygons from a GeoJSON FeatureCollection (WGS84).
pub fn read_cantons(path: &Path, columns: &GeometryConfig) -> Result<Vec<(u64, CantonRaw)>> {
    let reader = common_io::open_stream(path)?;
    let geojson = GeoJson::from_reader(reader)?;
    features_to_raw(geojson, columns)
}

pub fn parse_cantons(text: &str, columns: &GeometryConfig) -> Result<Vec<(u64, CantonRaw)>> {
    let geojson: GeoJson = text.parse()?;
    features_to_raw(geojson, columns)
}

fn features_to_raw(geojson: GeoJson, columns: &GeometryConfig) -> Result<Vec<(u64, CantonRaw)>> {
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(AtlasError::InvalidFormat(
                "canton geometry must be a FeatureCollection".to_string(),
            ))
        }
    };

    Ok(collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| {
            let name = property_text(&feature, &columns.canton_name_property);
            let province = property_text(&feature, &columns.province_property);
            (
                i as u64,
                CantonRaw {
                    name,
                    province,
                    geometry: feature.geometry,
                },
            )
        })
        .collect())
}

/// Property lookup tolerant to accents and case in the key (`CANTÓN` and
/// `canton` both match). Numbers are rendered as text.
fn property_text(feature: &Feature, wanted: &str) -> Option<String> {
    let props = feature.properties.as_ref()?;
    let value = props
        .get(wanted)
        .or_else(|| {
            props
                .iter()
                .find(|(k, _)| equals_folded(k, wanted))
                .map(|(_, v)| v)
        })?;
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_names_with_unaccented_keys() {
        let text = r#"{
          "type": "FeatureCollection",
          "features": [
            {"type": "Feature",
             "properties": {"canton": "Dota", "provincia": "San José"},
             "geometry": {"type": "Polygon", "coordinates": [[[-84.0,9.6],[-83.9,9.6],[-83.9,9.7],[-84.0,9.6]]]}}
          ]
        }"#;
        let rows = parse_cantons(text, &GeometryConfig::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.name.as_deref(), Some("Dota"));
        assert_eq!(rows[0].1.province.as_deref(), Some("San José"));
        assert!(rows[0].1.geometry.is_some());
    }

    #[test]
    fn bare_geometry_is_rejected() {
        let text = r#"{"type": "Point", "coordinates": [-84.0, 9.6]}"#;
        let err = parse_cantons(text, &GeometryConfig::default()).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidFormat(_)));
    }
}
