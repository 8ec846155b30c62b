// crates/centros-core/src/loader/schools.rs
use super::common_io;
use crate::error::Result;
use crate::raw::{SchoolRaw, SCHOOL_COLUMNS, SCHOOL_COORDINATE_COLUMNS, SCHOOL_REQUIRED_COLUMNS};
use crate::report::{LoadReport, SourceKind};
use std::path::Path;

/// Read `centros_educativos.csv` into raw rows.
pub fn read_schools(path: &Path, report: &mut LoadReport) -> Result<Vec<(u64, SchoolRaw)>> {
    let text = common_io::read_text(path)?;
    parse_schools(&text, report)
}

pub fn parse_schools(text: &str, report: &mut LoadReport) -> Result<Vec<(u64, SchoolRaw)>> {
    let required: Vec<&[&str]> = SCHOOL_REQUIRED_COLUMNS
        .iter()
        .chain(SCHOOL_COORDINATE_COLUMNS)
        .map(std::slice::from_ref)
        .collect();
    common_io::read_csv_rows(text, SourceKind::Schools, SCHOOL_COLUMNS, &required, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtlasError;

    #[test]
    fn parses_documented_columns_and_ignores_extras() {
        let text = "\
CODSABER,CENTRO_EDU,TIPO_INSTI,REGIONAL,CIRCUITO,PROVINCIA,CANTON,DISTRITO,POBLADO,DIRECCION,LATITUD,LONGITUD,TELEFONO
1001,Escuela Juan Rafael Mora,PÚBLICO,SAN JOSÉ CENTRAL,01,San José,San José,Carmen,Barrio Amón,100 m norte,9.9355,-84.0762,2222-2222
";
        let mut report = LoadReport::default();
        let rows = parse_schools(text, &mut report).unwrap();
        assert_eq!(rows.len(), 1);
        let (line, raw) = &rows[0];
        assert_eq!(*line, 2);
        assert_eq!(raw.code.as_deref(), Some("1001"));
        assert_eq!(raw.locality.as_deref(), Some("Barrio Amón"));
        assert_eq!(raw.status, None);
        assert!(report.is_empty());
    }

    #[test]
    fn coordinate_columns_are_required() {
        let mut report = LoadReport::default();
        let err = parse_schools("CODSABER,CENTRO_EDU,TIPO_INSTI\n1,x,PRIVADO\n", &mut report)
            .unwrap_err();
        assert!(matches!(err, AtlasError::MissingColumn { column, .. } if column == "LATITUD"));
    }

    #[test]
    fn mixed_case_headers_fill_coordinates() {
        let text = "Codsaber,Centro_Edu,Tipo_Insti,Provincia,Cantón,Dirección,Latitud,Longitud\n\
1001,Escuela Central,PÚBLICO,San José,Escazú,Centro,9.9186,-84.1397\n";
        let mut report = LoadReport::default();
        let rows = parse_schools(text, &mut report).unwrap();
        let raw = &rows[0].1;
        assert_eq!(raw.code.as_deref(), Some("1001"));
        assert_eq!(raw.canton.as_deref(), Some("Escazú"));
        assert_eq!(raw.address.as_deref(), Some("Centro"));
        assert_eq!(raw.latitude.as_deref(), Some("9.9186"));
        assert_eq!(raw.longitude.as_deref(), Some("-84.1397"));
        assert!(report.is_empty());
    }
}
