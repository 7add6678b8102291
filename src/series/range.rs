//! Closed civil-time ranges and range selection.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use thiserror::Error;

use super::{localize, Fold, Series};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("`{0}` is not a date (YYYY-MM-DD) or date-time (YYYY-MM-DDTHH:MM[:SS])")]
    Syntax(String),
    #[error("civil time {0} does not exist in {1}")]
    Nonexistent(NaiveDateTime, Tz),
    #[error("range start {start} is after end {end}")]
    Inverted { start: String, end: String },
}

/// A user-supplied range endpoint in civil time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CivilBound {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl FromStr for CivilBound {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(CivilBound::DateTime(dt));
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(CivilBound::Date)
            .map_err(|_| RangeError::Syntax(s.to_string()))
    }
}

/// Closed interval `[start, end]`, inclusive at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRange {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeRange {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        Ok(TimeRange { start, end })
    }

    /// A date-only start is local midnight; a date-only end is the last second
    /// of that local day. Repeated civil times widen the range.
    pub fn from_civil(start: CivilBound, end: CivilBound, tz: Tz) -> Result<Self, RangeError> {
        let start_naive = match start {
            CivilBound::Date(d) => d.and_time(NaiveTime::MIN),
            CivilBound::DateTime(dt) => dt,
        };
        let end_naive = match end {
            CivilBound::Date(d) => d.and_hms_opt(23, 59, 59).unwrap_or(d.and_time(NaiveTime::MIN)),
            CivilBound::DateTime(dt) => dt,
        };

        let start = localize(&tz, start_naive, Fold::Earliest)
            .ok_or(RangeError::Nonexistent(start_naive, tz))?;
        let end = localize(&tz, end_naive, Fold::Latest)
            .ok_or(RangeError::Nonexistent(end_naive, tz))?;

        TimeRange::new(start, end)
    }

    pub fn contains(&self, timestamp: &DateTime<Tz>) -> bool {
        self.start <= *timestamp && *timestamp <= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Samples with `range.start <= t <= range.end`. An empty result is not an error.
pub fn select_range(series: &Series, range: &TimeRange) -> Series {
    let samples = series
        .samples()
        .iter()
        .filter(|s| range.contains(&s.timestamp))
        .cloned()
        .collect();

    Series::new(series.name(), series.timezone(), samples)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use chrono_tz::US::Pacific;

    use super::*;
    use crate::series::Sample;

    fn utc(day: u32, hour: u32) -> DateTime<Tz> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0)
            .unwrap()
            .with_timezone(&Pacific)
    }

    fn hourly_series() -> Series {
        let samples = (0..24)
            .map(|h| Sample {
                timestamp: utc(9, h),
                value: Some(h as f64),
            })
            .collect();
        Series::new("AOD_500nm", Pacific, samples)
    }

    #[test]
    fn should_parse_bounds() {
        assert_eq!(
            "2024-03-10".parse::<CivilBound>().unwrap(),
            CivilBound::Date(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
        );
        assert!(matches!(
            "2024-03-10T01:30".parse::<CivilBound>().unwrap(),
            CivilBound::DateTime(_)
        ));
        assert!(matches!(
            "10/03/2024".parse::<CivilBound>(),
            Err(RangeError::Syntax(_))
        ));
    }

    #[test]
    fn should_include_both_endpoints() {
        let series = hourly_series();
        let range = TimeRange::new(utc(9, 4), utc(9, 6)).unwrap();

        let selected = select_range(&series, &range);

        let values: Vec<Option<f64>> = selected.samples().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![Some(4.0), Some(5.0), Some(6.0)]);
    }

    #[test]
    fn should_return_empty_series_outside_data() {
        let series = hourly_series();
        let range = TimeRange::new(utc(20, 0), utc(21, 0)).unwrap();

        let selected = select_range(&series, &range);

        assert!(selected.is_empty());
        assert_eq!(selected.name(), "AOD_500nm");
    }

    #[test]
    fn should_reject_inverted_range() {
        assert!(matches!(
            TimeRange::new(utc(10, 0), utc(9, 0)),
            Err(RangeError::Inverted { .. })
        ));
    }

    #[test]
    fn should_expand_whole_civil_days_across_dst() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let range =
            TimeRange::from_civil(CivilBound::Date(day), CivilBound::Date(day), Pacific).unwrap();

        assert_eq!(range.start.to_rfc3339(), "2024-03-10T00:00:00-08:00");
        assert_eq!(range.end.to_rfc3339(), "2024-03-10T23:59:59-07:00");
        // 23 hour civil day
        assert_eq!((range.end - range.start).num_seconds(), 23 * 3600 - 1);
    }

    #[test]
    fn should_widen_ambiguous_end() {
        let end: CivilBound = "2024-11-03T01:30:00".parse().unwrap();
        let start: CivilBound = "2024-11-03".parse().unwrap();

        let range = TimeRange::from_civil(start, end, Pacific).unwrap();

        assert_eq!(range.end.to_rfc3339(), "2024-11-03T01:30:00-08:00");
    }
}
