// crates/centros-core/src/search.rs
use crate::model::School;
use crate::text::fold_key;
use crate::traits::NameMatch;
use geo::{HaversineDistance, Point};
use serde::Serialize;
use std::cmp::Ordering;

/// A name search result.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NameHit<'a> {
    pub school: &'a School,
    /// Byte offset of the query inside the folded name.
    pub position: usize,
}

/// A location search result.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DistanceHit<'a> {
    pub school: &'a School,
    pub distance_km: f64,
}

/// Accent- and case-insensitive substring search on school names.
///
/// Every match is returned, ordered by match position, then folded name,
/// then code. An empty query returns nothing.
pub fn search_by_name<'a, I>(schools: I, query: &str) -> Vec<NameHit<'a>>
where
    I: IntoIterator<Item = &'a School>,
{
    let q = fold_key(query);
    if q.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<(NameHit<'a>, String)> = schools
        .into_iter()
        .filter_map(|school| {
            let folded = fold_key(school.name_str());
            folded
                .find(&q)
                .map(|position| (NameHit { school, position }, folded))
        })
        .collect();

    hits.sort_by(|(a, an), (b, bn)| {
        a.position
            .cmp(&b.position)
            .then_with(|| an.cmp(bn))
            .then_with(|| a.school.code.cmp(&b.school.code))
    });
    hits.into_iter().map(|(hit, _)| hit).collect()
}

/// Great-circle search around a target point.
///
/// With a radius, returns every school within `radius_km` by ascending
/// distance (ties by code). Without one, returns the single nearest school.
/// Schools with an invalid location are never candidates.
pub fn search_by_location<'a, I>(
    schools: I,
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
) -> Vec<DistanceHit<'a>>
where
    I: IntoIterator<Item = &'a School>,
{
    if !latitude.is_finite() || !longitude.is_finite() {
        return Vec::new();
    }
    let target = Point::new(longitude, latitude);

    let candidates = schools.into_iter().filter_map(|school| {
        school.point().map(|p| DistanceHit {
            school,
            distance_km: target.haversine_distance(&p) / 1000.0,
        })
    });

    match radius_km {
        Some(radius) => {
            let mut hits: Vec<DistanceHit<'a>> =
                candidates.filter(|h| h.distance_km <= radius).collect();
            hits.sort_by(by_distance_then_code);
            hits
        }
        None => candidates
            .min_by(by_distance_then_code)
            .into_iter()
            .collect(),
    }
}

fn by_distance_then_code(a: &DistanceHit<'_>, b: &DistanceHit<'_>) -> Ordering {
    a.distance_km
        .total_cmp(&b.distance_km)
        .then_with(|| a.school.code.cmp(&b.school.code))
}
