//! Input events as they appear in the log.

use std::fmt;

use serde::Serialize;

use crate::types::ClientName;

/// One line of the event log.
///
/// The timestamp is kept as raw text: checking that it is a valid `HH:MM`
/// is the engine's job, and an invalid one still has to be echoed back
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Timestamp as written in the log.
    pub time: String,
    /// Who the event is about.
    pub client: ClientName,
    /// What happened.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    pub fn new(time: impl Into<String>, client: ClientName, kind: EventKind) -> Self {
        Self {
            time: time.into(),
            client,
            kind,
        }
    }
}

/// The event vocabulary, keyed by the numeric code used in the log.
///
/// Numbers are kept as written. Whether a code or table number means
/// anything for this venue is decided during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Code 1: the client walks in.
    Arrival,
    /// Code 2: the client takes a table.
    Sit { table: i64 },
    /// Code 3: the client asks to wait for a table.
    WaitForTable,
    /// Code 4: the client leaves.
    Departure,
    /// Any other code. Processing it aborts the run.
    Unknown { code: i64 },
}

impl EventKind {
    pub const ARRIVAL: i64 = 1;
    pub const SIT: i64 = 2;
    pub const WAIT_FOR_TABLE: i64 = 3;
    pub const DEPARTURE: i64 = 4;

    /// Numeric code written in the log.
    pub const fn code(&self) -> i64 {
        match self {
            Self::Arrival => Self::ARRIVAL,
            Self::Sit { .. } => Self::SIT,
            Self::WaitForTable => Self::WAIT_FOR_TABLE,
            Self::Departure => Self::DEPARTURE,
            Self::Unknown { code } => *code,
        }
    }

    /// Short name used in logs and summaries.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Arrival => "arrival",
            Self::Sit { .. } => "sit",
            Self::WaitForTable => "wait_for_table",
            Self::Departure => "departure",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// Renders the echo line: `time code client [table]`.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.time, self.kind.code(), self.client)?;
        if let EventKind::Sit { table } = self.kind {
            write!(f, " {table}")?;
        }
        Ok(())
    }
}
