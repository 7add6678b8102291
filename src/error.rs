//! Row-level and file-level error taxonomy.
//!
//! Row errors are absorbed where they happen and counted in [`RowDiagnostics`].
//! File errors surface to the caller as a [`DataLoadError`].

use std::fmt;

use thiserror::Error;

/// How many row errors are kept verbatim for the log.
const MAX_SAMPLED_ERRORS: usize = 5;

/// A single row that could not be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowParseError {
    #[error("row {row}: timestamp `{value}` does not match format `{format}`")]
    Timestamp {
        row: usize,
        value: String,
        format: String,
    },
    #[error("row {row}: expected at least {expected} fields, found {found}")]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}: column `{column}` value `{value}` is not a number")]
    Number {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row}: field `{column}` value `{value}` should have {expected} subfields")]
    CompoundField {
        row: usize,
        column: String,
        value: String,
        expected: usize,
    },
    #[error("row {row}: unreadable record ({reason})")]
    Unreadable { row: usize, reason: String },
}

/// A whole file that cannot be turned into a series.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (expected columns {expected_columns:?}, found {found_columns:?})")]
pub struct DataLoadError {
    pub expected_columns: Vec<String>,
    pub found_columns: Vec<String>,
    pub message: String,
}

impl DataLoadError {
    pub fn missing_columns(expected: &[String], found: &[String]) -> Self {
        let missing: Vec<&str> = expected
            .iter()
            .filter(|c| !found.contains(c))
            .map(String::as_str)
            .collect();

        DataLoadError {
            expected_columns: expected.to_vec(),
            found_columns: found.to_vec(),
            message: format!("missing required columns: {}", missing.join(", ")),
        }
    }

    pub fn no_rows(expected: &[String], found: &[String]) -> Self {
        DataLoadError {
            expected_columns: expected.to_vec(),
            found_columns: found.to_vec(),
            message: "zero rows parsed".to_string(),
        }
    }

    pub fn unreadable(message: impl Into<String>) -> Self {
        DataLoadError {
            expected_columns: Vec::new(),
            found_columns: Vec::new(),
            message: message.into(),
        }
    }
}

/// Aggregate count of absorbed row errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowDiagnostics {
    pub parsed: usize,
    pub skipped: usize,
    pub samples: Vec<RowParseError>,
}

impl RowDiagnostics {
    pub fn record(&mut self, error: RowParseError) {
        log::debug!("skipping {}", error);
        self.skipped += 1;
        if self.samples.len() < MAX_SAMPLED_ERRORS {
            self.samples.push(error);
        }
    }

    pub fn merge(&mut self, other: RowDiagnostics) {
        self.parsed += other.parsed;
        self.skipped += other.skipped;
        for error in other.samples {
            if self.samples.len() >= MAX_SAMPLED_ERRORS {
                break;
            }
            self.samples.push(error);
        }
    }

    /// Emits one warning summarising skipped rows, if there were any.
    pub fn log_summary(&self, source: &str) {
        if self.skipped > 0 {
            log::warn!(
                "{}: skipped {} of {} rows (first: {})",
                source,
                self.skipped,
                self.parsed + self.skipped,
                self.samples
                    .first()
                    .map(|e| e.to_string())
                    .unwrap_or_default()
            );
        }
    }
}

impl fmt::Display for RowDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows parsed, {} skipped", self.parsed, self.skipped)
    }
}

// -- Tests -------------------------------------------------------------------
