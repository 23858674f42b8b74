//! Output records produced by the engine.
//!
//! Each record renders as exactly one output line via `Display`. Records are
//! also `Serialize` so front ends can emit them as JSON.

use std::fmt;

use serde::Serialize;

use crate::event::Event;
use crate::time::{ClockTime, format_hhmm};
use crate::types::{ClientName, TableId};

/// Code for a departure the engine synthesized.
pub const FORCED_DEPARTURE_CODE: u32 = 11;
/// Code for a seating the engine synthesized from the wait queue.
pub const AUTO_SEATING_CODE: u32 = 12;
/// Code for an error line.
pub const ERROR_CODE: u32 = 13;

/// Why a single event was refused. State is left untouched and replay
/// continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rejection {
    /// Arrival outside opening hours.
    NotOpenYet,
    /// Arrival of a client who is already inside.
    YouShallNotPass,
    /// The client is not in a state that allows the event.
    ClientUnknown,
    /// The requested table is occupied.
    PlaceIsBusy,
    /// Asked to wait while a table is free.
    #[serde(rename = "ICanWaitNoLonger!")]
    ICanWaitNoLonger,
}

impl Rejection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotOpenYet => "NotOpenYet",
            Self::YouShallNotPass => "YouShallNotPass",
            Self::ClientUnknown => "ClientUnknown",
            Self::PlaceIsBusy => "PlaceIsBusy",
            Self::ICanWaitNoLonger => "ICanWaitNoLonger!",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that end the run. Nothing after the offending event is processed
/// and the closing report is not produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Fatal {
    /// Malformed timestamp, or a table number this venue does not have.
    IncorrectFormat,
    /// Event code outside the known vocabulary.
    UnknownEvent,
}

impl Fatal {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IncorrectFormat => "IncorrectFormat",
            Self::UnknownEvent => "UnknownEvent",
        }
    }
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage and revenue of one table at closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub table: TableId,
    pub revenue: u64,
    /// Total occupied minutes over the day.
    pub minutes: u32,
}

impl TableSummary {
    /// Occupied time as `HH:MM`.
    pub fn usage(&self) -> String {
        format_hhmm(self.minutes)
    }
}

/// One line of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    /// First line: the opening time.
    Opened { time: ClockTime },
    /// An input event repeated back.
    Echo { event: Event },
    /// Code 11: a client removed by the club.
    ForcedDeparture { time: ClockTime, client: ClientName },
    /// Code 12: the head of the wait queue seated at a freed table.
    AutoSeated {
        time: ClockTime,
        client: ClientName,
        table: TableId,
    },
    /// Code 13 for a refused event.
    Rejected { time: ClockTime, reason: Rejection },
    /// Code 13 for a fatal error. The time is echoed raw since it may be
    /// the very thing that failed to parse.
    Failed { time: String, error: Fatal },
    /// The closing time, after all forced departures.
    Closed { time: ClockTime },
    /// One line of the revenue report.
    Table(TableSummary),
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opened { time } | Self::Closed { time } => write!(f, "{time}"),
            Self::Echo { event } => write!(f, "{event}"),
            Self::ForcedDeparture { time, client } => {
                write!(f, "{time} {FORCED_DEPARTURE_CODE} {client}")
            }
            Self::AutoSeated {
                time,
                client,
                table,
            } => write!(f, "{time} {AUTO_SEATING_CODE} {client} {table}"),
            Self::Rejected { time, reason } => write!(f, "{time} {ERROR_CODE} {reason}"),
            Self::Failed { time, error } => write!(f, "{time} {ERROR_CODE} {error}"),
            Self::Table(summary) => write!(
                f,
                "{} {} {}",
                summary.table,
                summary.revenue,
                summary.usage()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    fn at(hour: u8, minute: u8) -> ClockTime {
        ClockTime::from_hm(hour, minute).unwrap()
    }

    fn client(name: &str) -> ClientName {
        ClientName::new(name).unwrap()
    }

    #[test]
    fn renders_synthesized_lines() {
        let forced = Record::ForcedDeparture {
            time: at(19, 0),
            client: client("bob"),
        };
        assert_eq!(forced.to_string(), "19:00 11 bob");

        let seated = Record::AutoSeated {
            time: at(9, 20),
            client: client("bob"),
            table: TableId::new(1).unwrap(),
        };
        assert_eq!(seated.to_string(), "09:20 12 bob 1");
    }

    #[test]
    fn renders_error_lines() {
        let rejected = Record::Rejected {
            time: at(9, 15),
            reason: Rejection::ICanWaitNoLonger,
        };
        assert_eq!(rejected.to_string(), "09:15 13 ICanWaitNoLonger!");

        let failed = Record::Failed {
            time: "9:15".to_string(),
            error: Fatal::IncorrectFormat,
        };
        assert_eq!(failed.to_string(), "9:15 13 IncorrectFormat");
    }

    #[test]
    fn renders_table_summary() {
        let line = Record::Table(TableSummary {
            table: TableId::new(2).unwrap(),
            revenue: 100,
            minutes: 580,
        });
        assert_eq!(line.to_string(), "2 100 09:40");
    }

    #[test]
    fn renders_echo() {
        let echo = Record::Echo {
            event: Event::new("09:00", client("alice"), EventKind::Arrival),
        };
        assert_eq!(echo.to_string(), "09:00 1 alice");
    }

    #[test]
    fn rejection_serializes_with_log_name() {
        let json = serde_json::to_string(&Rejection::ICanWaitNoLonger).unwrap();
        assert_eq!(json, "\"ICanWaitNoLonger!\"");

        let record = Record::Rejected {
            time: at(8, 48),
            reason: Rejection::NotOpenYet,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"record": "rejected", "time": "08:48", "reason": "NotOpenYet"})
        );
    }
}
