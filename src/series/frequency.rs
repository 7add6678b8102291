//! Resampling frequency tokens such as `1h`, `3h`, `30min`, `1d`.

use std::{fmt, str::FromStr};

use thiserror::Error;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrequencyError {
    #[error("empty frequency")]
    Empty,
    #[error("unknown frequency unit in `{0}` (use s, min, h or d)")]
    Unit(String),
    #[error("frequency `{0}` must be a positive whole number of units")]
    Count(String),
}

/// Bucket width for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frequency {
    seconds: i64,
}

/// How bucket boundaries are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid {
    /// Multiples of `width` seconds since the Unix epoch.
    Epoch { width: i64 },
    /// Steps of `width` seconds from each local midnight. `width` divides a day.
    CivilSlots { width: i64 },
    /// Runs of `days` civil days starting 1970-01-01, at local midnight.
    CivilDays { days: i64 },
}

impl Frequency {
    pub fn from_seconds(seconds: i64) -> Option<Self> {
        (seconds > 0).then_some(Frequency { seconds })
    }

    pub fn hours(hours: i64) -> Self {
        Frequency {
            seconds: hours.max(1) * 3600,
        }
    }

    pub fn days(days: i64) -> Self {
        Frequency {
            seconds: days.max(1) * SECONDS_PER_DAY,
        }
    }

    #[cfg(test)]
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Whole days run from local midnight, widths dividing a day step from
    /// each local midnight, anything else falls back to the epoch.
    pub fn grid(&self) -> Grid {
        if self.seconds % SECONDS_PER_DAY == 0 {
            Grid::CivilDays {
                days: self.seconds / SECONDS_PER_DAY,
            }
        } else if SECONDS_PER_DAY % self.seconds == 0 {
            Grid::CivilSlots {
                width: self.seconds,
            }
        } else {
            Grid::Epoch {
                width: self.seconds,
            }
        }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::hours(1)
    }
}

impl FromStr for Frequency {
    type Err = FrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FrequencyError::Empty);
        }

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (count, unit) = s.split_at(split);
        let count: i64 = if count.is_empty() {
            1
        } else {
            count
                .parse()
                .map_err(|_| FrequencyError::Count(s.to_string()))?
        };

        let unit_seconds = match unit {
            "s" | "S" => 1,
            "min" | "T" | "m" => 60,
            "h" | "H" => 3600,
            "d" | "D" => SECONDS_PER_DAY,
            _ => return Err(FrequencyError::Unit(s.to_string())),
        };

        count
            .checked_mul(unit_seconds)
            .and_then(Frequency::from_seconds)
            .ok_or_else(|| FrequencyError::Count(s.to_string()))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds;
        if s % SECONDS_PER_DAY == 0 {
            write!(f, "{}d", s / SECONDS_PER_DAY)
        } else if s % 3600 == 0 {
            write!(f, "{}h", s / 3600)
        } else if s % 60 == 0 {
            write!(f, "{}min", s / 60)
        } else {
            write!(f, "{}s", s)
        }
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_parse_tokens() {
        assert_eq!("1h".parse::<Frequency>().unwrap().seconds(), 3600);
        assert_eq!("3H".parse::<Frequency>().unwrap().seconds(), 3 * 3600);
        assert_eq!("30min".parse::<Frequency>().unwrap().seconds(), 1800);
        assert_eq!("15T".parse::<Frequency>().unwrap().seconds(), 900);
        assert_eq!("d".parse::<Frequency>().unwrap().seconds(), 86_400);
        assert_eq!("10s".parse::<Frequency>().unwrap().seconds(), 10);
    }

    #[test]
    fn should_reject_bad_tokens() {
        assert_eq!("".parse::<Frequency>(), Err(FrequencyError::Empty));
        assert!(matches!("0h".parse::<Frequency>(), Err(FrequencyError::Count(_))));
        assert!(matches!("2w".parse::<Frequency>(), Err(FrequencyError::Unit(_))));
        assert!(matches!("12".parse::<Frequency>(), Err(FrequencyError::Unit(_))));
    }

    #[test]
    fn should_pick_grid() {
        assert_eq!(
            Frequency::hours(3).grid(),
            Grid::CivilSlots { width: 10_800 }
        );
        assert_eq!(
            "30min".parse::<Frequency>().unwrap().grid(),
            Grid::CivilSlots { width: 1800 }
        );
        assert_eq!(Frequency::hours(7).grid(), Grid::Epoch { width: 25_200 });
        assert_eq!(Frequency::hours(36).grid(), Grid::Epoch { width: 129_600 });
        assert_eq!(Frequency::days(2).grid(), Grid::CivilDays { days: 2 });
        assert_eq!(Frequency::hours(24).grid(), Grid::CivilDays { days: 1 });
    }

    #[test]
    fn should_display_token() {
        assert_eq!(Frequency::hours(3).to_string(), "3h");
        assert_eq!(Frequency::days(1).to_string(), "1d");
        assert_eq!("90min".parse::<Frequency>().unwrap().to_string(), "90min");
    }
}
