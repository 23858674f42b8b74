//! Venue configuration read from the log header.

use thiserror::Error;

use crate::time::ClockTime;
use crate::types::TableId;

/// Invalid header values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("table count must be at least 1")]
    NoTables,

    #[error("opening time {open} must be earlier than closing time {close}")]
    ClosesBeforeOpening { open: ClockTime, close: ClockTime },

    #[error("hourly rate must be positive")]
    ZeroRate,
}

/// Immutable parameters of one business day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubConfig {
    table_count: u32,
    open_time: ClockTime,
    close_time: ClockTime,
    hourly_rate: u32,
}

impl ClubConfig {
    /// Validates and builds a configuration.
    pub fn new(
        table_count: u32,
        open_time: ClockTime,
        close_time: ClockTime,
        hourly_rate: u32,
    ) -> Result<Self, ConfigError> {
        if table_count == 0 {
            return Err(ConfigError::NoTables);
        }
        if open_time >= close_time {
            return Err(ConfigError::ClosesBeforeOpening {
                open: open_time,
                close: close_time,
            });
        }
        if hourly_rate == 0 {
            return Err(ConfigError::ZeroRate);
        }
        Ok(Self {
            table_count,
            open_time,
            close_time,
            hourly_rate,
        })
    }

    pub const fn table_count(&self) -> u32 {
        self.table_count
    }

    pub const fn open_time(&self) -> ClockTime {
        self.open_time
    }

    pub const fn close_time(&self) -> ClockTime {
        self.close_time
    }

    pub const fn hourly_rate(&self) -> u32 {
        self.hourly_rate
    }

    /// Whether `time` falls inside `[open, close)`.
    pub fn is_open_at(&self, time: ClockTime) -> bool {
        time >= self.open_time && time < self.close_time
    }

    /// The table with this number, if the venue has one.
    pub fn table(&self, number: i64) -> Option<TableId> {
        let number = u32::try_from(number).ok()?;
        if number > self.table_count {
            return None;
        }
        TableId::new(number).ok()
    }
}
