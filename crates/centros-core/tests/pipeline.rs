// crates/centros-core/tests/pipeline.rs
//
// End-to-end: files on disk -> Atlas -> aggregates, table, search.

use centros_core::aggregate::FilterSet;
use centros_core::config::SourcePaths;
use centros_core::present::{DensityMetric, SortDirection, SortKey};
use centros_core::{Atlas, AtlasConfig, AtlasError, InstitutionType};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCHOOLS: &str = "\
CODSABER,CENTRO_EDU,TIPO_INSTI,ESTADO,REGIONAL,CIRCUITO,PROVINCIA,CANTON,DISTRITO,POBLADO,DIRECCION,LATITUD,LONGITUD
0101,LICEO DE COSTA RICA,PÚBLICO,ACTIVO,SAN JOSE CENTRAL,01,SAN JOSÉ,SAN JOSÉ,HOSPITAL,PASO ANCHO,100 m sur,9.90,-84.10
0102,Colegio Saint Francis,PRIVADO,,SAN JOSE NORTE,02,San José,San José,Catedral,,,9.85,-84.05
0103,Escuela Líceo Escazú,PÚBLICO,,SAN JOSE OESTE,03,San José,Escazú,Escazú,,,9.90,-84.30
0104,Escuela Bernardo Soto,PÚBLICO,,ALAJUELA,01,ALAJUELA,ALAJUELA,Alajuela,,,10.20,-84.20
0105,Colegio Marista,PRIVADO,,ALAJUELA,01,Alajuela,Alajuela,Alajuela,,,10.30,-84.10
0106,Escuela en el límite,PÚBLICO,,SAN JOSE OESTE,03,San José,Escazú,,,,9.90,-84.20
0107,Escuela sin coordenadas,PÚBLICO,,ALAJUELA,02,Alajuela,Grecia,,,,,
0108,Escuela fuera del país,PÚBLICO,,ALAJUELA,02,Alajuela,Grecia,,,,0,0
0108,Duplicado,PÚBLICO,,ALAJUELA,02,Alajuela,Grecia,,,,10.2,-84.5
0109,Escuela Mixta,MIXTO,,ALAJUELA,02,Alajuela,Grecia,,,,10.2,-84.5
,Sin código,PÚBLICO,,ALAJUELA,02,Alajuela,Grecia,,,,10.2,-84.5
";

fn square(name: &str, province: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> String {
    format!(
        r#"{{"type":"Feature","properties":{{"CANTÓN":"{name}","PROVINCIA":"{province}"}},
"geometry":{{"type":"Polygon","coordinates":[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]}}}}"#
    )
}

fn cantons_geojson() -> String {
    let features = [
        square("SAN JOSÉ", "San José", -84.2, 9.8, -84.0, 10.0),
        square("Escazú", "San José", -84.4, 9.8, -84.2, 10.0),
        square("Alajuela", "Alajuela", -84.4, 10.0, -84.0, 10.4),
        square("Grecia", "Alajuela", -84.6, 10.0, -84.4, 10.4),
        r#"{"type":"Feature","properties":{"CANTÓN":"Roto"},"geometry":{"type":"Point","coordinates":[-84.0,10.0]}}"#.to_string(),
    ];
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

/// Census table in Latin-1, as published.
fn population_latin1() -> Vec<u8> {
    let text = "CANTÓN,POBLACIÓN TOTAL,TOTAL VIVIENDAS\n\
                San José,\"352,381\",\"110,000\"\n\
                Escazú,0,20000\n\
                Alajuela,\"322,000\",\"100,000\"\n\
                Atlántida,1000,10\n";
    text.chars().map(|c| c as u32 as u8).collect()
}

struct Fixture {
    _dir: TempDir,
    sources: SourcePaths,
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let sources = SourcePaths {
        schools: write(dir.path(), "centros_educativos.csv", SCHOOLS.as_bytes()),
        cantons: write(dir.path(), "cantones.geojson", cantons_geojson().as_bytes()),
        population: write(dir.path(), "poblacion.csv", &population_latin1()),
    };
    Fixture { _dir: dir, sources }
}

fn open(f: &Fixture) -> Atlas {
    let config = AtlasConfig {
        sources: f.sources.clone(),
        ..AtlasConfig::default()
    };
    Atlas::open(config).unwrap()
}

#[test]
fn loads_and_reports_bad_rows() {
    let f = fixture();
    let atlas = open(&f);
    let stats = atlas.stats();

    // 0101..0108 kept; duplicate 0108, MIXTO and the blank code rejected.
    assert_eq!(stats.schools, 8);
    assert_eq!(stats.schools_with_location, 6);
    assert_eq!(stats.cantons, 4);

    let counts = atlas.warning_counts();
    assert_eq!(counts.get("duplicate_identifier"), Some(&1));
    assert_eq!(counts.get("unknown_institution_type"), Some(&1));
    assert_eq!(counts.get("missing_identifier"), Some(&1));
    assert_eq!(counts.get("invalid_coordinate"), Some(&2));
    assert_eq!(counts.get("malformed_geometry"), Some(&1));
    assert_eq!(counts.get("unmatched_population"), Some(&1)); // Grecia
    assert_eq!(counts.get("orphan_population"), Some(&1)); // Atlántida
    assert_eq!(counts.get("ambiguous_match"), Some(&1)); // 0106 on the shared edge
}

#[test]
fn school_in_san_jose_center_is_assigned_to_san_jose() {
    let f = fixture();
    let atlas = open(&f);
    let canton = atlas.assigned_canton("0101").unwrap();
    assert_eq!(canton.name(), "SAN JOSÉ");
    assert_eq!(canton.key(), "san jose");
}

#[test]
fn shared_edge_goes_to_smaller_key() {
    let f = fixture();
    let atlas = open(&f);
    assert_eq!(atlas.assigned_canton("0106").unwrap().key(), "escazu");
}

#[test]
fn unfiltered_counts_sum_to_valid_schools() {
    let f = fixture();
    let atlas = open(&f);
    let agg = atlas.aggregate(&FilterSet::all());
    let valid = atlas.stats().schools_with_location;
    assert_eq!(agg.total_schools() + agg.unassigned, valid);
    assert_eq!(agg.unassigned, 0);
    assert_eq!(agg.invalid_coordinate, 2);
    for row in &agg.rows {
        assert_eq!(row.breakdown.public + row.breakdown.private, row.school_count);
    }
    // Grecia is listed with zero schools.
    assert_eq!(agg.row("Grecia").map(|r| r.school_count), Some(0));
}

#[test]
fn latin1_census_is_joined_and_zero_population_is_null() {
    let f = fixture();
    let atlas = open(&f);
    let agg = atlas.aggregate(&FilterSet::all());

    let san_jose = agg.row("San José").unwrap();
    assert_eq!(san_jose.population, Some(352_381));
    assert_eq!(san_jose.dwellings, Some(110_000));
    assert!(san_jose.density_schools_per_10k_pop.is_some());

    let escazu = agg.row("Escazu").unwrap();
    assert_eq!(escazu.population, Some(0));
    assert_eq!(escazu.density_schools_per_10k_pop, None);

    let grecia = agg.row("Grecia").unwrap();
    assert_eq!(grecia.population, None);
    assert_eq!(grecia.density_schools_per_10k_pop, None);
    assert!(grecia.density_schools_per_km2.is_some());
}

#[test]
fn aggregation_is_deterministic() {
    let f = fixture();
    let a = open(&f);
    let b = open(&f);
    let filter = FilterSet::all().with_institution_type(InstitutionType::Public);
    let ja = serde_json::to_string(&a.aggregate(&filter)).unwrap();
    let jb = serde_json::to_string(&b.aggregate(&filter)).unwrap();
    assert_eq!(ja, jb);
    assert_eq!(ja, serde_json::to_string(&a.aggregate(&filter)).unwrap());
}

#[test]
fn alajuela_public_filter_restricts_table_and_aggregates() {
    let f = fixture();
    let atlas = open(&f);
    let filter = FilterSet::all()
        .with_province("Alajuela")
        .with_institution_type(InstitutionType::Public);

    let table = atlas.school_table(&filter, SortKey::Code, SortDirection::Ascending);
    let codes: Vec<_> = table.iter().map(|r| r.code).collect();
    assert_eq!(codes, ["0104", "0107", "0108"]);

    let agg = atlas.aggregate(&filter);
    let keys: Vec<_> = agg.rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, ["alajuela", "grecia"]);
    assert_eq!(agg.row("alajuela").unwrap().school_count, 1);
    assert_eq!(agg.row("alajuela").unwrap().breakdown.private, 0);
    assert_eq!(agg.invalid_coordinate, 2);
}

#[test]
fn name_search_finds_every_liceo() {
    let f = fixture();
    let atlas = open(&f);
    let hits = atlas.search_by_name("Liceo", &FilterSet::all());
    let codes: Vec<_> = hits.iter().map(|h| h.school.code.as_str()).collect();
    // "liceo de costa rica" at 0, "escuela liceo escazu" at 8.
    assert_eq!(codes, ["0101", "0103"]);
}

#[test]
fn location_search_uses_radius_or_nearest() {
    let f = fixture();
    let atlas = open(&f);
    let nearest = atlas.search_by_location(9.91, -84.11, None, &FilterSet::all());
    assert_eq!(nearest.len(), 1);
    assert_eq!(nearest[0].school.code, "0101");

    let within = atlas.search_by_location(9.90, -84.10, Some(1.0), &FilterSet::all());
    assert_eq!(within.len(), 1);
    let wide = atlas.search_by_location(9.90, -84.10, Some(50.0), &FilterSet::all());
    assert_eq!(wide.len(), 6);
    assert!(wide.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
}

#[test]
fn map_export_is_a_feature_collection() {
    let f = fixture();
    let atlas = open(&f);
    let layers = atlas.map_layers(&FilterSet::all(), DensityMetric::SchoolsPerKm2);
    assert_eq!(layers.points.len(), 6);
    let fc = layers.to_feature_collection();
    assert_eq!(fc.features.len(), 4 + 6);
}

#[test]
fn missing_source_is_fatal() {
    let f = fixture();
    let mut sources = f.sources.clone();
    sources.population = f.sources.population.with_file_name("nope.csv");
    let err = Atlas::open(AtlasConfig {
        sources,
        ..AtlasConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, AtlasError::NotFound(_)));
}

#[test]
fn missing_required_column_is_fatal() {
    let f = fixture();
    write(
        f._dir.path(),
        "centros_educativos.csv",
        b"CODSABER,CENTRO_EDU,LATITUD,LONGITUD\n1,x,9.9,-84.1\n",
    );
    let err = Atlas::open(AtlasConfig {
        sources: f.sources.clone(),
        ..AtlasConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, AtlasError::MissingColumn { .. }));
}

#[cfg(feature = "compact")]
#[test]
fn gzip_sources_are_decompressed() {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let f = fixture();
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(SCHOOLS.as_bytes()).unwrap();
    let gz = write(f._dir.path(), "centros_educativos.csv.gz", &enc.finish().unwrap());

    let mut sources = f.sources.clone();
    sources.schools = gz;
    let atlas = Atlas::open(AtlasConfig {
        sources,
        ..AtlasConfig::default()
    })
    .unwrap();
    assert_eq!(atlas.stats().schools, 8);
}
