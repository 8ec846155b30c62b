// crates/centros-core/src/model/convert.rs

//! **Standard Converter:** Raw rows -> validated domain records.
//!
//! Each function consumes raw records together with their source line (or
//! feature index) and appends to a [`LoadReport`] instead of failing.

use super::domain::{
    Canton, CantonId, CoordinateIssue, InstitutionType, Location, PopulationRecord, School,
    SchoolStatus, Snapshot,
};
use crate::config::Bounds;
use crate::raw::{CantonRaw, PopulationRaw, SchoolRaw};
use crate::report::{DataWarning, LoadReport, SourceKind};
use crate::text::{fold_key, non_blank, parse_opt_count, parse_opt_f64};
use geo::{BoundingRect, GeodesicArea, MultiPolygon, Polygon};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Validate school rows.
///
/// Rows without `CODSABER`, with a duplicate code or an unknown
/// institution type are rejected. Rows with a bad coordinate are kept with
/// an [`Location::Invalid`] location.
pub fn schools_from_raw(
    rows: impl IntoIterator<Item = (u64, SchoolRaw)>,
    bounds: &Bounds,
    report: &mut LoadReport,
) -> Vec<School> {
    let mut out = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (line, raw) in rows {
        let Some(code) = non_blank(raw.code.as_deref()).map(str::to_owned) else {
            report.push(DataWarning::MissingIdentifier {
                source: SourceKind::Schools,
                line,
            });
            continue;
        };

        if seen.contains(&code) {
            report.push(DataWarning::DuplicateIdentifier { code, line });
            continue;
        }

        let type_text = raw.institution_type.as_deref().unwrap_or("").trim();
        let Some(institution_type) = InstitutionType::parse(type_text) else {
            report.push(DataWarning::UnknownInstitutionType {
                code,
                value: type_text.to_owned(),
            });
            continue;
        };

        let latitude = parse_opt_f64(raw.latitude.as_deref());
        let longitude = parse_opt_f64(raw.longitude.as_deref());
        let location = match (latitude, longitude) {
            (Some(lat), Some(lon)) if bounds.contains(lat, lon) => Location::Valid {
                latitude: lat,
                longitude: lon,
            },
            (Some(_), Some(_)) => Location::Invalid {
                latitude,
                longitude,
                issue: CoordinateIssue::OutOfBounds,
            },
            _ => Location::Invalid {
                latitude,
                longitude,
                issue: CoordinateIssue::Missing,
            },
        };
        if !location.is_valid() {
            report.push(DataWarning::InvalidCoordinate {
                code: code.clone(),
                latitude,
                longitude,
            });
        }

        let province = non_blank(raw.province.as_deref()).map(str::to_owned);
        let province_key = province.as_deref().map(fold_key).unwrap_or_default();

        seen.insert(code.clone());
        out.push(School {
            name: non_blank(raw.name.as_deref()).unwrap_or(&code).to_owned(),
            code,
            institution_type,
            status: SchoolStatus::parse(raw.status.as_deref()),
            region: non_blank(raw.region.as_deref()).map(str::to_owned),
            circuit: non_blank(raw.circuit.as_deref()).map(str::to_owned),
            province,
            canton: non_blank(raw.canton.as_deref()).map(str::to_owned),
            district: non_blank(raw.district.as_deref()).map(str::to_owned),
            locality: non_blank(raw.locality.as_deref()).map(str::to_owned),
            address: non_blank(raw.address.as_deref()).map(str::to_owned),
            location,
            province_key,
        });
    }

    out
}

/// Validate census rows. A row without a canton name is rejected, and so is
/// a later row whose folded name repeats an earlier one. A row without a
/// usable total is kept (dwellings may still be present) and flagged.
pub fn population_from_raw(
    rows: impl IntoIterator<Item = (u64, PopulationRaw)>,
    report: &mut LoadReport,
) -> Vec<PopulationRecord> {
    let mut out = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (line, raw) in rows {
        let Some(canton) = non_blank(raw.canton.as_deref()) else {
            report.push(DataWarning::MissingIdentifier {
                source: SourceKind::Population,
                line,
            });
            continue;
        };
        let key = fold_key(canton);
        if !seen.insert(key.clone()) {
            report.push(DataWarning::DuplicatePopulation {
                canton: canton.to_owned(),
                line,
            });
            continue;
        }
        let population = parse_opt_count(raw.population.as_deref());
        if population.is_none() {
            report.push(DataWarning::MissingPopulation {
                canton: canton.to_owned(),
            });
        }
        out.push(PopulationRecord {
            canton: canton.to_owned(),
            key,
            population,
            dwellings: parse_opt_count(raw.dwellings.as_deref()),
        });
    }
    out
}

/// Convert a GeoJSON geometry into polygons, or explain why not.
fn polygons_of(geometry: Option<geojson::Geometry>) -> Result<Vec<Polygon<f64>>, String> {
    let geometry = geometry.ok_or_else(|| "no geometry".to_string())?;
    let converted: geo::Geometry<f64> = geometry
        .value
        .try_into()
        .map_err(|e: geojson::Error| e.to_string())?;
    let polygons = match converted {
        geo::Geometry::Polygon(p) => vec![p],
        geo::Geometry::MultiPolygon(mp) => mp.0,
        other => return Err(format!("expected polygon, got {}", geometry_kind(&other))),
    };
    let polygons: Vec<_> = polygons
        .into_iter()
        .filter(|p| p.exterior().0.len() >= 4)
        .collect();
    if polygons.is_empty() {
        return Err("empty polygon".to_string());
    }
    Ok(polygons)
}

fn geometry_kind(g: &geo::Geometry<f64>) -> &'static str {
    match g {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        _ => "other geometry",
    }
}

/// Build cantons from features.
///
/// Features sharing a normalized name are merged into one multipolygon.
/// The result is sorted by key and ids are assigned in that order.
pub fn cantons_from_raw(
    features: impl IntoIterator<Item = (u64, CantonRaw)>,
    report: &mut LoadReport,
) -> Vec<Canton> {
    // key -> (first feature, display name, province, polygons)
    let mut merged: BTreeMap<String, MergedCanton> = BTreeMap::new();

    for (feature, raw) in features {
        let Some(name) = non_blank(raw.name.as_deref()).map(str::to_owned) else {
            report.push(DataWarning::MissingIdentifier {
                source: SourceKind::Cantons,
                line: feature,
            });
            continue;
        };
        let polygons = match polygons_of(raw.geometry) {
            Ok(p) => p,
            Err(reason) => {
                report.push(DataWarning::MalformedGeometry { feature, reason });
                continue;
            }
        };

        let key = fold_key(&name);
        match merged.get_mut(&key) {
            Some((_, _, _, existing)) => {
                report.push(DataWarning::DuplicateCanton { key: key.clone() });
                existing.extend(polygons);
            }
            None => {
                let province = non_blank(raw.province.as_deref())
                    .unwrap_or("")
                    .to_owned();
                merged.insert(key, (feature, name, province, polygons));
            }
        }
    }

    let mut out = Vec::with_capacity(merged.len());
    for (key, parts) in merged {
        match assemble_canton(out.len(), key, parts) {
            Ok(canton) => out.push(canton),
            Err(warning) => report.push(warning),
        }
    }
    out
}

type MergedCanton = (u64, String, String, Vec<Polygon<f64>>);

/// Turn merged polygons into the canton at output position `index`.
/// Failures are reported against the first source feature of the canton.
fn assemble_canton(
    index: usize,
    key: String,
    (feature, name, province, polygons): MergedCanton,
) -> Result<Canton, DataWarning> {
    let id = u16::try_from(index).map_err(|_| DataWarning::MalformedGeometry {
        feature,
        reason: format!("{name}: more than {} cantons", u16::MAX as usize + 1),
    })?;
    let geometry = MultiPolygon::new(polygons);
    let bbox = geometry
        .bounding_rect()
        .ok_or_else(|| DataWarning::MalformedGeometry {
            feature,
            reason: format!("{name}: no extent"),
        })?;
    let area_km2 = geometry.geodesic_area_unsigned() / 1_000_000.0;
    Ok(Canton {
        id: CantonId(id),
        name,
        key,
        province,
        geometry,
        bbox,
        area_km2: (area_km2.is_finite() && area_km2 > 0.0).then_some(area_km2),
        population: None,
    })
}

/// Join census rows onto cantons by normalized key.
///
/// Both directions of a mismatch are reported: cantons without a census
/// row and census rows without a canton.
pub fn attach_population(
    cantons: &mut [Canton],
    population: &[PopulationRecord],
    report: &mut LoadReport,
) {
    let by_key: HashMap<&str, &PopulationRecord> =
        population.iter().map(|p| (p.key.as_str(), p)).collect();

    for canton in cantons.iter_mut() {
        match by_key.get(canton.key.as_str()) {
            Some(record) => canton.population = Some((*record).clone()),
            None => report.push(DataWarning::UnmatchedPopulation {
                canton: canton.name.clone(),
            }),
        }
    }

    let canton_keys: HashSet<&str> = cantons.iter().map(|c| c.key.as_str()).collect();
    for record in population {
        if !canton_keys.contains(record.key.as_str()) {
            report.push(DataWarning::OrphanPopulation {
                canton: record.canton.clone(),
            });
        }
    }
}

/// Assemble a [`Snapshot`] from raw inputs.
pub fn build_snapshot(
    schools: impl IntoIterator<Item = (u64, SchoolRaw)>,
    cantons: impl IntoIterator<Item = (u64, CantonRaw)>,
    population: impl IntoIterator<Item = (u64, PopulationRaw)>,
    bounds: &Bounds,
    mut report: LoadReport,
) -> Snapshot {
    let schools = schools_from_raw(schools, bounds, &mut report);
    let mut cantons = cantons_from_raw(cantons, &mut report);
    let population = population_from_raw(population, &mut report);
    attach_population(&mut cantons, &population, &mut report);

    tracing::info!(
        schools = schools.len(),
        cantons = cantons.len(),
        population = population.len(),
        warnings = report.len(),
        "snapshot assembled"
    );

    Snapshot {
        schools,
        cantons,
        population,
        report,
    }
}
