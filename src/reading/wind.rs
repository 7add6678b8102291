//! NOAA Integrated Surface Database hourly exports.
//!
//! Wind and temperature arrive as compound fields:
//!
//! ```text
//! WND = direction,direction_quality,type,speed_tenths,speed_quality   e.g. 318,1,N,0036,5
//! TMP = signed_tenths,quality                                         e.g. +0156,5
//! ```
//!
//! The speed quality code is the flag used for filtering.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::{
    config::PipelineConfig,
    error::{DataLoadError, RowDiagnostics, RowParseError},
    series::{parse_measurement, AlignedTable, ColumnRef, Sample, Series, TimestampSpec},
    vector::WindObservation,
};

use super::Reading;

pub const DATE_COLUMN: &str = "DATE";
pub const WND_COLUMN: &str = "WND";
pub const TMP_COLUMN: &str = "TMP";
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const WND_SUBFIELDS: usize = 5;
const TMP_SUBFIELDS: usize = 2;
const SPEED_SCALE: f64 = 0.1;
const TEMPERATURE_DIVISOR: f64 = 10.0;
const TEMPERATURE_MISSING: f64 = 9999.0;

#[derive(Debug, Clone)]
pub struct WindReadings {
    pub observations: Vec<WindObservation>,
    /// Present when the file carries a `TMP` column.
    pub temperature: Option<Series>,
    pub diagnostics: RowDiagnostics,
}

fn subfields(text: &str) -> Vec<&str> {
    text.split([',', ':']).map(str::trim).collect()
}

fn observation_from_wnd(
    row: usize,
    timestamp: DateTime<Tz>,
    text: &str,
) -> Result<WindObservation, RowParseError> {
    let parts = subfields(text);
    if parts.len() != WND_SUBFIELDS {
        return Err(RowParseError::CompoundField {
            row,
            column: WND_COLUMN.to_string(),
            value: text.to_string(),
            expected: WND_SUBFIELDS,
        });
    }

    Ok(WindObservation {
        timestamp,
        direction: parts[0].to_string(),
        magnitude: parts[3].to_string(),
        magnitude_scale: SPEED_SCALE,
        flag: parts[4].to_string(),
    })
}

/// Degrees Celsius, or `None` when missing or not passing `accepted_flag`.
fn temperature_from_tmp(
    row: usize,
    text: &str,
    accepted_flag: &str,
) -> Result<Option<f64>, RowParseError> {
    let parts = subfields(text);
    if parts.len() != TMP_SUBFIELDS {
        return Err(RowParseError::CompoundField {
            row,
            column: TMP_COLUMN.to_string(),
            value: text.to_string(),
            expected: TMP_SUBFIELDS,
        });
    }
    if parts[1] != accepted_flag {
        return Ok(None);
    }

    parse_measurement(parts[0], &[TEMPERATURE_MISSING])
        .map(|v| v.map(|t| t / TEMPERATURE_DIVISOR))
        .map_err(|_| RowParseError::Number {
            row,
            column: TMP_COLUMN.to_string(),
            value: parts[0].to_string(),
        })
}

impl Reading for WindReadings {
    fn skip_rows(_config: &PipelineConfig) -> usize {
        0
    }

    fn diagnostics(&self) -> &RowDiagnostics {
        &self.diagnostics
    }

    fn timestamp_spec() -> TimestampSpec {
        TimestampSpec::new(vec![ColumnRef::Name(DATE_COLUMN.to_string())], TIME_FORMAT)
    }

    fn from_aligned(table: AlignedTable, config: &PipelineConfig) -> Result<Self, DataLoadError> {
        let required = [DATE_COLUMN.to_string(), WND_COLUMN.to_string()];
        let wnd = table.require_columns(&required)?[1];
        let tmp = table.column_index(TMP_COLUMN);
        let accepted_flag = config.accepted_flag.trim();

        let mut diagnostics = table.diagnostics.clone();
        let mut observations = Vec::with_capacity(table.rows.len());
        let mut temperatures = Vec::new();

        for (i, aligned) in table.rows.iter().enumerate() {
            let row = i + 1;
            let wnd_text = aligned.fields.get(wnd).map(String::as_str).unwrap_or("");

            match observation_from_wnd(row, aligned.timestamp, wnd_text) {
                Ok(obs) => observations.push(obs),
                Err(e) => {
                    diagnostics.record(e);
                    continue;
                }
            }

            if let Some(tmp_text) = tmp.and_then(|t| aligned.fields.get(t)) {
                let value = temperature_from_tmp(row, tmp_text, accepted_flag).unwrap_or_else(|e| {
                    diagnostics.record(e);
                    None
                });
                temperatures.push(Sample {
                    timestamp: aligned.timestamp,
                    value,
                });
            }
        }
        if observations.is_empty() {
            return Err(DataLoadError::no_rows(&required, &table.headers));
        }
        diagnostics.parsed = observations.len();

        let temperature = tmp.map(|_| Series::new("temperature", table.timezone, temperatures));

        Ok(WindReadings {
            observations,
            temperature,
            diagnostics,
        })
    }
}

// -- Tests -------------------------------------------------------------------
