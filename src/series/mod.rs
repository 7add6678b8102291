//! Time-series aligner: timezone-aware series, range selection and resampling.
//!
//! ```text
//!  RawTable ──parse──▶ AlignedTable ──series──▶ Series
//!                                                  │
//!                                    select_range  ▼
//!                                               Series ──resample──▶ Vec<Bucket>
//! ```

pub mod align;
pub mod frequency;
pub mod range;
pub mod resample;

use std::num::ParseFloatError;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

pub use align::{parse, AlignedRow, AlignedTable, ColumnRef, TimestampSpec};
pub use frequency::Frequency;
pub use range::{select_range, CivilBound, TimeRange};
pub use resample::{resample, ResampleError};

/// One reading. `None` is the explicit "no data" marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Tz>,
    pub value: Option<f64>,
}

/// One sensor's readings, sorted by instant with unique timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    timezone: Tz,
    samples: Vec<Sample>,
}

impl Series {
    /// Sorts by instant and drops repeated timestamps, keeping the first in input order.
    pub fn new(name: impl Into<String>, timezone: Tz, mut samples: Vec<Sample>) -> Self {
        for sample in samples.iter_mut() {
            sample.timestamp = sample.timestamp.with_timezone(&timezone);
            if sample.value.is_some_and(f64::is_nan) {
                sample.value = None;
            }
        }
        samples.sort_by_key(|s| s.timestamp);
        samples.dedup_by_key(|s| s.timestamp);

        Series {
            name: name.into(),
            timezone,
            samples,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A resampled window starting at `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub start: DateTime<Tz>,
    pub value: Option<f64>,
}

/// A named, plot-ready line.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledSeries {
    pub name: String,
    pub buckets: Vec<Bucket>,
}

impl ResampledSeries {
    pub fn from_series(series: &Series, frequency: Frequency) -> Result<Self, ResampleError> {
        Ok(ResampledSeries {
            name: series.name().to_string(),
            buckets: resample(series, frequency)?,
        })
    }
}

/// Parses a numeric field. Blank text, NaN and any of `sentinels` become `None`.
pub fn parse_measurement(text: &str, sentinels: &[f64]) -> Result<Option<f64>, ParseFloatError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let value: f64 = text.parse()?;

    if value.is_nan() || sentinels.contains(&value) {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

/// Which instant to pick when a civil time occurs twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Fold {
    Earliest,
    Latest,
}

/// Resolves a civil time in `tz`. Times inside a spring-forward gap move
/// forward in 15 minute steps until they exist.
pub(crate) fn localize(tz: &Tz, naive: NaiveDateTime, fold: Fold) -> Option<DateTime<Tz>> {
    for step in 0..=12 {
        let candidate = tz.from_local_datetime(&(naive + Duration::minutes(15 * step)));
        let resolved = match fold {
            Fold::Earliest => candidate.earliest(),
            Fold::Latest => candidate.latest(),
        };
        if resolved.is_some() {
            return resolved;
        }
    }

    None
}

// -- Tests -------------------------------------------------------------------
