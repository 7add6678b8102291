//! Fixed-grid resampling by mean.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use thiserror::Error;

use super::{
    frequency::{Frequency, Grid},
    localize, Bucket, Fold, Series,
};

/// Upper bound on the buckets one resample may allocate.
pub const MAX_BUCKETS: u64 = 1_000_000;

/// Longest civil day, covering a one hour fall-back.
const LONGEST_DAY_SECONDS: i64 = 25 * 3600;

#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "resampling would create {buckets} buckets (limit {limit}); \
     narrow the range or use a coarser frequency"
)]
pub struct ResampleError {
    pub buckets: u64,
    pub limit: u64,
}

impl Grid {
    /// Index of the bucket holding `timestamp`.
    pub fn key(&self, timestamp: &DateTime<Tz>) -> i64 {
        match *self {
            Grid::Epoch { width } => timestamp.timestamp().div_euclid(width),
            Grid::CivilSlots { width } => {
                let date = timestamp.date_naive();
                let since_midnight = local_midnight(&timestamp.timezone(), date)
                    .map_or(0, |m| (*timestamp - m).num_seconds().max(0));

                days_since_epoch(date) * slots_per_day(width) + since_midnight / width
            }
            Grid::CivilDays { days } => days_since_epoch(timestamp.date_naive()).div_euclid(days),
        }
    }

    /// Start instant of bucket `key`, expressed in `tz`. `None` for slots
    /// past the end of a short civil day.
    pub fn start(&self, key: i64, tz: &Tz) -> Option<DateTime<Tz>> {
        match *self {
            Grid::Epoch { width } => {
                DateTime::from_timestamp(key.checked_mul(width)?, 0).map(|t| t.with_timezone(tz))
            }
            Grid::CivilSlots { width } => {
                let per_day = slots_per_day(width);
                let date = epoch_date()
                    .checked_add_signed(Duration::days(key.div_euclid(per_day)))?;
                let midnight = local_midnight(tz, date)?;
                let next_midnight = local_midnight(tz, date.succ_opt()?)?;
                let start = midnight
                    .checked_add_signed(Duration::seconds(key.rem_euclid(per_day) * width))?;

                (start < next_midnight).then_some(start)
            }
            Grid::CivilDays { days } => {
                let date = epoch_date().checked_add_signed(Duration::days(key.checked_mul(days)?))?;
                local_midnight(tz, date)
            }
        }
    }

    /// Inclusive key span covering every timestamp, or `None` when there are none.
    pub fn span<'a, I>(&self, timestamps: I) -> Option<(i64, i64)>
    where
        I: IntoIterator<Item = &'a DateTime<Tz>>,
    {
        timestamps.into_iter().fold(None, |span, t| {
            let key = self.key(t);
            Some(match span {
                None => (key, key),
                Some((lo, hi)) => (lo.min(key), hi.max(key)),
            })
        })
    }
}

/// 1970-01-01
fn epoch_date() -> NaiveDate {
    NaiveDate::default()
}

fn days_since_epoch(date: NaiveDate) -> i64 {
    (date - epoch_date()).num_days()
}

fn slots_per_day(width: i64) -> i64 {
    (LONGEST_DAY_SECONDS + width - 1) / width
}

fn local_midnight(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    localize(tz, date.and_time(NaiveTime::MIN), Fold::Earliest)
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Averages keyed values onto every bucket in `span`. Buckets with no
/// non-missing value come back as `None`.
pub(crate) fn resample_keyed<I>(
    grid: Grid,
    tz: &Tz,
    span: (i64, i64),
    values: I,
) -> Result<Vec<Bucket>, ResampleError>
where
    I: IntoIterator<Item = (i64, Option<f64>)>,
{
    let (first, last) = span;
    let buckets = last
        .checked_sub(first)
        .and_then(|d| d.checked_add(1))
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(u64::MAX);
    if buckets > MAX_BUCKETS {
        return Err(ResampleError {
            buckets,
            limit: MAX_BUCKETS,
        });
    }

    let mut accumulators = vec![Accumulator::default(); buckets as usize];
    for (key, value) in values {
        if let Some(acc) = usize::try_from(key - first)
            .ok()
            .and_then(|i| accumulators.get_mut(i))
        {
            acc.add(value);
        }
    }

    Ok(accumulators
        .iter()
        .zip(first..=last)
        .filter_map(|(acc, key)| {
            grid.start(key, tz).map(|start| Bucket {
                start,
                value: acc.mean(),
            })
        })
        .collect())
}

/// Groups samples into fixed-width buckets aligned to the calendar grid, not to
/// the first sample, and takes the mean of non-missing values per bucket.
pub fn resample(series: &Series, frequency: Frequency) -> Result<Vec<Bucket>, ResampleError> {
    let grid = frequency.grid();
    let tz = series.timezone();
    let Some(span) = grid.span(series.samples().iter().map(|s| &s.timestamp)) else {
        return Ok(Vec::new());
    };

    resample_keyed(
        grid,
        &tz,
        span,
        series
            .samples()
            .iter()
            .map(|s| (grid.key(&s.timestamp), s.value)),
    )
}

// -- Tests -------------------------------------------------------------------
