//! AERONET aerosol optical depth exports.
//!
//! After a six line preamble the header names `Date(dd:mm:yyyy)`,
//! `Time(hh:mm:ss)`, then one `AOD_<nnn>nm` column per wavelength. Missing
//! values are written as `-999`.

use crate::{
    config::PipelineConfig,
    error::{DataLoadError, RowDiagnostics},
    series::{AlignedTable, ColumnRef, Series, TimestampSpec},
};

use super::Reading;

pub const TIME_FORMAT: &str = "%d:%m:%Y %H:%M:%S";
pub const MISSING: f64 = -999.0;
pub const DEFAULT_WAVELENGTHS: [u32; 3] = [380, 500, 870];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// Wavelength in nanometres, as named by an `AOD_<nnn>nm` column.
pub struct Wavelength(pub u32);

impl Wavelength {
    pub fn from_column(name: &str) -> Option<Self> {
        let digits = name.strip_prefix("AOD_")?.strip_suffix("nm")?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        digits.parse().ok().map(Wavelength)
    }

    pub fn column(&self) -> String {
        format!("AOD_{}nm", self.0)
    }
}

/// All wavelength columns in `headers`, shortest wavelength first.
pub fn wavelength_columns(headers: &[String]) -> Vec<Wavelength> {
    let mut wavelengths: Vec<Wavelength> = headers
        .iter()
        .filter_map(|h| Wavelength::from_column(h))
        .collect();
    wavelengths.sort();
    wavelengths.dedup();

    wavelengths
}

/// Requested columns if any, else the default wavelengths that are present,
/// else every wavelength column.
pub fn select_columns(
    headers: &[String],
    requested: &[String],
) -> Result<Vec<String>, DataLoadError> {
    if !requested.is_empty() {
        if requested.iter().all(|c| headers.contains(c)) {
            return Ok(requested.to_vec());
        }
        return Err(DataLoadError::missing_columns(requested, headers));
    }

    let available = wavelength_columns(headers);
    let defaults: Vec<String> = DEFAULT_WAVELENGTHS
        .iter()
        .map(|&nm| Wavelength(nm))
        .filter(|w| available.contains(w))
        .map(|w| w.column())
        .collect();

    if !defaults.is_empty() {
        Ok(defaults)
    } else if !available.is_empty() {
        Ok(available.iter().map(Wavelength::column).collect())
    } else {
        let expected: Vec<String> = DEFAULT_WAVELENGTHS
            .iter()
            .map(|&nm| Wavelength(nm).column())
            .collect();
        Err(DataLoadError::missing_columns(&expected, headers))
    }
}

/// One series per selected wavelength.
#[derive(Debug, Clone)]
pub struct AodReadings {
    pub series: Vec<Series>,
    pub diagnostics: RowDiagnostics,
}

impl Reading for AodReadings {
    fn skip_rows(config: &PipelineConfig) -> usize {
        config.skip_rows
    }

    fn diagnostics(&self) -> &RowDiagnostics {
        &self.diagnostics
    }

    fn timestamp_spec() -> TimestampSpec {
        TimestampSpec::new(vec![ColumnRef::Index(0), ColumnRef::Index(1)], TIME_FORMAT)
    }

    fn from_aligned(table: AlignedTable, config: &PipelineConfig) -> Result<Self, DataLoadError> {
        let columns = select_columns(&table.headers, &config.aod_columns)?;
        let mut diagnostics = table.diagnostics.clone();
        let mut series = Vec::with_capacity(columns.len());

        for column in &columns {
            let (s, field_errors) = table.series(column, &[MISSING])?;
            diagnostics.merge(field_errors);
            series.push(s);
        }

        Ok(AodReadings {
            series,
            diagnostics,
        })
    }
}

// -- Tests -------------------------------------------------------------------
