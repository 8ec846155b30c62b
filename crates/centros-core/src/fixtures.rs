// crates/centros-core/src/fixtures.rs

// Shared in-memory dataset for unit tests.
//
//   Grecia     | Alajuela (-84.4..-84.0, 10.0..10.4)
//   -----------+---------------------------------------
//              | Escazú (-84.4..-84.2) | San José (-84.2..-84.0)   y 9.8..10.0
//
// Census: San José 300 000, Escazú 0, Alajuela 250 000, Grecia missing.

use crate::config::Bounds;
use crate::model::convert::build_snapshot;
use crate::model::Snapshot;
use crate::raw::{CantonRaw, PopulationRaw, SchoolRaw};
use crate::report::LoadReport;

pub(crate) fn rect(name: &str, province: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> CantonRaw {
    CantonRaw {
        name: Some(name.into()),
        province: Some(province.into()),
        geometry: Some(geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![x0, y0],
            vec![x1, y0],
            vec![x1, y1],
            vec![x0, y1],
            vec![x0, y0],
        ]]))),
    }
}

fn school(code: &str, name: &str, tipo: &str, province: &str, lat: &str, lon: &str) -> SchoolRaw {
    SchoolRaw {
        code: Some(code.into()),
        name: Some(name.into()),
        institution_type: Some(tipo.into()),
        province: Some(province.into()),
        latitude: Some(lat.into()),
        longitude: Some(lon.into()),
        ..Default::default()
    }
}

fn census(canton: &str, population: &str) -> PopulationRaw {
    PopulationRaw {
        canton: Some(canton.into()),
        population: Some(population.into()),
        dwellings: Some("1000".into()),
        ..Default::default()
    }
}

pub(crate) fn snapshot() -> Snapshot {
    let mut closed = school("9", "Escuela Cerrada", "PÚBLICO", "Alajuela", "10.1", "-84.3");
    closed.status = Some("Cerrado".into());

    let schools = vec![
        school("1", "Liceo de San José", "PÚBLICO", "San José", "9.9", "-84.1"),
        school("2", "Escuela Central", "PRIVADO", "San José", "9.85", "-84.05"),
        school("3", "Liceo de Escazú", "Pública", "San José", "9.9", "-84.3"),
        school("4", "Escuela Alajuela", "Pública", "Alajuela", "10.2", "-84.2"),
        school("5", "Colegio Privado Alajuela", "PRIVADO", "Alajuela", "10.3", "-84.1"),
        school("6", "Escuela Grecia", "PÚBLICO", "Alajuela", "10.2", "-84.5"),
        school("7", "Escuela Sin Coordenadas", "PÚBLICO", "Alajuela", "", ""),
        school("8", "Escuela Frontera", "PÚBLICO", "Guanacaste", "10.5", "-85.5"),
        closed,
    ];
    let cantons = vec![
        rect("San José", "San José", -84.2, 9.8, -84.0, 10.0),
        rect("Escazú", "San José", -84.4, 9.8, -84.2, 10.0),
        rect("Alajuela", "Alajuela", -84.4, 10.0, -84.0, 10.4),
        rect("Grecia", "Alajuela", -84.6, 10.0, -84.4, 10.4),
    ];
    let population = vec![
        census("SAN JOSE", "300000"),
        census("Escazú", "0"),
        census("Alajuela", "250,000"),
    ];

    build_snapshot(
        (2..).zip(schools),
        (0..).zip(cantons),
        (2..).zip(population),
        &Bounds::COSTA_RICA,
        LoadReport::default(),
    )
}
