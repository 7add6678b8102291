//! Wind vector transformer: quality filtering, polar to Cartesian, resampling.
//!
//! Directions are compass bearings measured clockwise from North, so North is
//! `+y` and East is `+x`:
//!
//! ```text
//! x = m * sin(d)
//! y = m * cos(d)
//! ```

use chrono::DateTime;
use chrono_tz::Tz;

use crate::series::{
    parse_measurement, resample::resample_keyed, Frequency, ResampleError, Sample, Series,
};

/// NOAA missing-value codes for the direction and speed subfields.
const DIRECTION_MISSING: f64 = 999.0;
const SPEED_MISSING: f64 = 9999.0;

/// One raw wind record, fields kept as text until validation.
#[derive(Debug, Clone, PartialEq)]
pub struct WindObservation {
    pub timestamp: DateTime<Tz>,
    pub direction: String,
    pub magnitude: String,
    /// Multiplier turning the raw magnitude into speed units (0.1 for tenths).
    pub magnitude_scale: f64,
    pub flag: String,
}

/// An observation that passed quality control. Calms carry no direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidWind {
    pub timestamp: DateTime<Tz>,
    pub direction_deg: Option<f64>,
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterReport {
    /// Includes calms.
    pub accepted: usize,
    pub calm: usize,
    pub rejected_flag: usize,
    pub malformed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianSample {
    pub timestamp: DateTime<Tz>,
    pub x: f64,
    pub y: f64,
}

/// x and y averaged over the same window.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorBucket {
    pub start: DateTime<Tz>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Keeps observations whose flag equals `accepted_flag` and whose direction and
/// magnitude are finite, in range and not missing codes. A missing direction
/// with zero speed is a calm and is kept. Dropped observations are counted,
/// never raised.
pub fn filter_valid(
    observations: &[WindObservation],
    accepted_flag: &str,
) -> (Vec<ValidWind>, FilterReport) {
    let accepted_flag = accepted_flag.trim();
    let mut report = FilterReport::default();
    let mut valid = Vec::with_capacity(observations.len());

    for obs in observations {
        if obs.flag.trim() != accepted_flag {
            report.rejected_flag += 1;
            continue;
        }

        match validate(obs) {
            Some(wind) => {
                report.accepted += 1;
                if wind.direction_deg.is_none() {
                    report.calm += 1;
                }
                valid.push(wind);
            }
            None => {
                log::debug!(
                    "dropping wind at {}: direction `{}` magnitude `{}`",
                    obs.timestamp,
                    obs.direction,
                    obs.magnitude
                );
                report.malformed += 1;
            }
        }
    }

    (valid, report)
}

fn validate(obs: &WindObservation) -> Option<ValidWind> {
    let direction = parse_measurement(&obs.direction, &[DIRECTION_MISSING]).ok()?;
    let magnitude = parse_measurement(&obs.magnitude, &[SPEED_MISSING]).ok()??;
    let speed = magnitude * obs.magnitude_scale;
    if !speed.is_finite() || speed < 0.0 {
        return None;
    }

    match direction {
        Some(d) if (0.0..=360.0).contains(&d) => Some(ValidWind {
            timestamp: obs.timestamp,
            direction_deg: Some(d),
            speed,
        }),
        None if speed == 0.0 => Some(ValidWind {
            timestamp: obs.timestamp,
            direction_deg: None,
            speed,
        }),
        _ => None,
    }
}

/// Compass bearing and magnitude to Cartesian components.
pub fn to_cartesian(direction_deg: f64, magnitude: f64) -> Cartesian {
    let radians = direction_deg.to_radians();

    Cartesian {
        x: magnitude * radians.sin(),
        y: magnitude * radians.cos(),
    }
}

impl ValidWind {
    /// Calms map to the zero vector.
    pub fn to_cartesian(&self) -> CartesianSample {
        let Cartesian { x, y } = match self.direction_deg {
            Some(direction) => to_cartesian(direction, self.speed),
            None => Cartesian { x: 0.0, y: 0.0 },
        };

        CartesianSample {
            timestamp: self.timestamp,
            x,
            y,
        }
    }
}

/// Resamples x and y onto one shared grid so each bucket pairs components
/// from the same window. No samples gives no buckets.
pub fn resample_vectors(
    samples: &[CartesianSample],
    frequency: Frequency,
) -> Result<Vec<VectorBucket>, ResampleError> {
    let Some(tz) = samples.first().map(|s| s.timestamp.timezone()) else {
        return Ok(Vec::new());
    };
    let grid = frequency.grid();
    let Some(span) = grid.span(samples.iter().map(|s| &s.timestamp)) else {
        return Ok(Vec::new());
    };

    let keys: Vec<i64> = samples.iter().map(|s| grid.key(&s.timestamp)).collect();
    let xs = resample_keyed(
        grid,
        &tz,
        span,
        keys.iter().zip(samples).map(|(&k, s)| (k, Some(s.x))),
    )?;
    let ys = resample_keyed(
        grid,
        &tz,
        span,
        keys.iter().zip(samples).map(|(&k, s)| (k, Some(s.y))),
    )?;

    Ok(xs
        .into_iter()
        .zip(ys)
        .map(|(x, y)| VectorBucket {
            start: x.start,
            x: x.value,
            y: y.value,
        })
        .collect())
}

/// Wind speed of the accepted observations, calms included, as a line series.
pub fn speed_series(valid: &[ValidWind], tz: Tz) -> Series {
    let samples = valid
        .iter()
        .map(|w| Sample {
            timestamp: w.timestamp,
            value: Some(w.speed),
        })
        .collect();

    Series::new("wind_speed", tz, samples)
}

// -- Tests -------------------------------------------------------------------
