// crates/centros-core/src/loader/population.rs
use super::common_io;
use crate::error::Result;
use crate::raw::{
    PopulationRaw, POPULATION_COLUMNS, POPULATION_NAME_COLUMNS, POPULATION_TOTAL_COLUMNS,
};
use crate::report::{LoadReport, SourceKind};
use std::path::Path;

/// Read `poblacion_vivienda_canton.csv`. The census office publishes it in
/// Latin-1; UTF-8 is accepted too.
pub fn read_population(path: &Path, report: &mut LoadReport) -> Result<Vec<(u64, PopulationRaw)>> {
    let text = common_io::read_text(path)?;
    parse_population(&text, report)
}

pub fn parse_population(text: &str, report: &mut LoadReport) -> Result<Vec<(u64, PopulationRaw)>> {
    common_io::read_csv_rows(
        text,
        SourceKind::Population,
        POPULATION_COLUMNS,
        &[POPULATION_NAME_COLUMNS, POPULATION_TOTAL_COLUMNS],
        report,
    )
}
