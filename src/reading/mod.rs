//! Source file formats: raw tables, AERONET AOD and NOAA ISD wind.

pub mod aod;
pub mod table;
pub mod wind;

use std::path::Path;

pub use aod::AodReadings;
pub use table::RawTable;
pub use wind::WindReadings;

use crate::{
    config::PipelineConfig,
    error::{DataLoadError, RowDiagnostics},
    series::{self, AlignedTable, TimestampSpec},
};

/// A source format that turns an aligned table into typed readings.
pub trait Reading: Sized {
    /// Preamble lines before the header.
    fn skip_rows(config: &PipelineConfig) -> usize;
    fn timestamp_spec() -> TimestampSpec;
    fn from_aligned(table: AlignedTable, config: &PipelineConfig) -> Result<Self, DataLoadError>;
    /// Rows parsed and skipped while loading.
    fn diagnostics(&self) -> &RowDiagnostics;

    fn from_table(table: RawTable, config: &PipelineConfig) -> Result<Self, DataLoadError> {
        let aligned = series::parse(table, &Self::timestamp_spec(), config.timezone)?;
        Self::from_aligned(aligned, config)
    }

    #[cfg(test)]
    fn from_text(text: &str, config: &PipelineConfig) -> Result<Self, DataLoadError> {
        Self::from_table(RawTable::from_text(text, Self::skip_rows(config))?, config)
    }
}

/// Loads a readings file from the file system.
pub fn load<R: Reading>(path: &Path, config: &PipelineConfig) -> Result<R, DataLoadError> {
    let table = RawTable::from_path(path, R::skip_rows(config))?;
    log::debug!(
        "{}: {} columns, {} raw rows",
        path.display(),
        table.headers.len(),
        table.rows.len()
    );

    R::from_table(table, config)
}
