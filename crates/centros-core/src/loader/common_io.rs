// crates/centros-core/src/loader/common_io.rs
use crate::error::{AtlasError, Result};
use crate::report::{DataWarning, LoadReport, SourceKind};
use crate::text::{decode_utf8_or_latin1, equals_folded, fold_key};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Opens a file, buffers it, and wraps it in a Gzip decoder when the path
/// ends in `.gz`. A missing file is the one fatal startup condition.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        AtlasError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    if is_gzip(path) {
        #[cfg(feature = "compact")]
        {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
        #[cfg(not(feature = "compact"))]
        {
            return Err(AtlasError::InvalidFormat(format!(
                "{} is gzip-compressed but the `compact` feature is disabled",
                path.display()
            )));
        }
    }

    Ok(Box::new(reader))
}

/// Read a whole text source, accepting UTF-8 or Latin-1.
pub fn read_text(path: &Path) -> Result<String> {
    let mut stream = open_stream(path)?;
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(decode_utf8_or_latin1(bytes))
}

/// Parse CSV text into `(line, row)` pairs.
///
/// Headers are first rewritten onto `columns`, the field names `T`
/// deserializes from, so `Población Total` reaches the `POBLACION TOTAL`
/// field. `required` lists header groups: each group must be satisfied by at
/// least one of its alternatives (compared folded), otherwise the file is
/// rejected. Undecodable rows are reported and skipped.
pub fn read_csv_rows<T: DeserializeOwned>(
    text: &str,
    source: SourceKind,
    columns: &[&str],
    required: &[&[&str]],
    report: &mut LoadReport,
) -> Result<Vec<(u64, T)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = canonical_headers(rdr.headers()?, columns);
    for group in required {
        let present = group
            .iter()
            .any(|want| headers.iter().any(|h| equals_folded(h, want)));
        if !present {
            return Err(AtlasError::MissingColumn {
                source_name: source_name(source),
                column: group.join(" | "),
            });
        }
    }

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                report.push(DataWarning::MalformedRow {
                    source,
                    line: e.position().map(|p| p.line()).unwrap_or(0),
                    reason: e.to_string(),
                });
                continue;
            }
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push((line, row)),
            Err(e) => report.push(DataWarning::MalformedRow {
                source,
                line,
                reason: e.to_string(),
            }),
        }
    }

    tracing::debug!(%source, rows = rows.len(), "csv parsed");
    Ok(rows)
}

/// Replace each header whose folded form matches a known column with that
/// column's exact name. Unknown headers pass through unchanged.
fn canonical_headers(headers: &csv::StringRecord, columns: &[&str]) -> csv::StringRecord {
    let folded: Vec<(String, &str)> = columns.iter().map(|c| (fold_key(c), *c)).collect();
    headers
        .iter()
        .map(|h| {
            let key = fold_key(h);
            folded
                .iter()
                .find(|(k, _)| *k == key)
                .map_or(h, |(_, c)| *c)
        })
        .collect()
}

fn source_name(source: SourceKind) -> &'static str {
    match source {
        SourceKind::Schools => "schools",
        SourceKind::Cantons => "cantons",
        SourceKind::Population => "population",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(rename = "A")]
        a: String,
        #[serde(rename = "B", default)]
        b: Option<String>,
    }

    const COLUMNS: &[&str] = &["A", "B"];

    #[test]
    fn missing_required_column_is_fatal() {
        let mut report = LoadReport::default();
        let err =
            read_csv_rows::<Row>("A,C\n1,2\n", SourceKind::Schools, COLUMNS, &[&["B"]], &mut report)
                .unwrap_err();
        assert!(matches!(err, AtlasError::MissingColumn { .. }));
    }

    #[test]
    fn ragged_rows_are_reported_not_fatal() {
        let mut report = LoadReport::default();
        let rows = read_csv_rows::<Row>(
            "A,B\n1,x\n2,y,extra\n3,z\n",
            SourceKind::Population,
            COLUMNS,
            &[&["A"]],
            &mut report,
        )
        .unwrap();
        let values: Vec<_> = rows.iter().map(|(_, r)| r.a.as_str()).collect();
        assert_eq!(values, ["1", "3"]);
        assert_eq!(rows[0].0, 2);
        assert_eq!(report.count("malformed_row"), 1);
    }

    #[test]
    fn header_alternatives_match_folded() {
        let mut report = LoadReport::default();
        let rows = read_csv_rows::<Row>(
            " A , b \n1,x\n",
            SourceKind::Schools,
            COLUMNS,
            &[&["a"], &["B", "Bee"]],
            &mut report,
        );
        assert!(rows.is_ok());
    }

    #[test]
    fn folded_headers_reach_their_fields() {
        let mut report = LoadReport::default();
        let rows = read_csv_rows::<Row>(
            "a,b\n1,x\n",
            SourceKind::Schools,
            COLUMNS,
            &[&["A"]],
            &mut report,
        )
        .unwrap();
        assert_eq!(rows[0].1.a, "1");
        assert_eq!(rows[0].1.b.as_deref(), Some("x"));
        assert!(report.is_empty());
    }

    #[test]
    fn open_stream_reports_missing_file() {
        let result = open_stream(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(AtlasError::NotFound(_))));
    }
}
