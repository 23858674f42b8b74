//! Wall-clock times in `HH:MM` form.
//!
//! All times are minutes since midnight of a single business day. There is
//! no date component: opening and closing always fall on the same day.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes in one hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Errors produced when reading a clock time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// The text is not two digits, a colon, and two digits.
    #[error("invalid time {value:?}, expected HH:MM")]
    Malformed { value: String },

    /// Hour or minute is outside the clock range.
    #[error("time {value:?} is out of range (hours 00-23, minutes 00-59)")]
    OutOfRange { value: String },
}

/// A time of day, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Midnight, `00:00`.
    pub const MIDNIGHT: Self = Self(0);

    /// Builds a time from an hour and minute, validating both.
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(u16::from(hour) * 60 + u16::from(minute)))
    }

    /// Minutes since midnight.
    #[must_use]
    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    /// Minutes elapsed from `self` until `later`, clamped at zero.
    #[must_use]
    pub fn minutes_until(self, later: Self) -> u32 {
        later.minutes().saturating_sub(self.minutes())
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeError::Malformed {
            value: s.to_string(),
        };

        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(malformed());
        }
        let (hh, mm) = (&bytes[..2], &bytes[3..]);
        if !hh.iter().chain(mm).all(u8::is_ascii_digit) {
            return Err(malformed());
        }

        let hour = (hh[0] - b'0') * 10 + (hh[1] - b'0');
        let minute = (mm[0] - b'0') * 10 + (mm[1] - b'0');
        Self::from_hm(hour, minute).ok_or_else(|| TimeError::OutOfRange {
            value: s.to_string(),
        })
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_hhmm(self.minutes()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// Formats a minute count as zero-padded `HH:MM`.
///
/// Used both for clock times and for accumulated durations; hours are not
/// wrapped at 24.
pub fn format_hhmm(total_minutes: u32) -> String {
    let hours = total_minutes / MINUTES_PER_HOUR;
    let minutes = total_minutes % MINUTES_PER_HOUR;
    format!("{hours:02}:{minutes:02}")
}

/// Whole hours to bill for a duration, rounding any partial hour up.
pub const fn billable_hours(total_minutes: u32) -> u32 {
    total_minutes.div_ceil(MINUTES_PER_HOUR)
}
