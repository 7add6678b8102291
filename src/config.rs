//! Pipeline configuration passed explicitly into every load and transform.

use chrono_tz::Tz;

use crate::series::{Frequency, TimeRange};

/// Preamble lines in an AERONET AOD export before the column header.
pub const DEFAULT_SKIP_ROWS: usize = 6;
/// NOAA quality code for "passed all quality control checks".
pub const DEFAULT_ACCEPTED_FLAG: &str = "5";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::US::Pacific;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Closed selection range; `None` keeps everything.
    pub range: Option<TimeRange>,
    pub frequency: Frequency,
    /// Civil zone used for selection, bucketing and labels.
    pub timezone: Tz,
    pub accepted_flag: String,
    /// AOD columns to plot; empty picks the default wavelengths.
    pub aod_columns: Vec<String>,
    pub skip_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            range: None,
            frequency: Frequency::default(),
            timezone: DEFAULT_TIMEZONE,
            accepted_flag: DEFAULT_ACCEPTED_FLAG.to_string(),
            aod_columns: Vec::new(),
            skip_rows: DEFAULT_SKIP_ROWS,
        }
    }
}

impl PipelineConfig {
    pub fn in_range(&self, timestamp: &chrono::DateTime<Tz>) -> bool {
        self.range.as_ref().map_or(true, |r| r.contains(timestamp))
    }
}
