//! Core domain logic for replaying a club's event log.
//!
//! This crate contains:
//! - Time: strict `HH:MM` clock times and duration formatting
//! - Input: reading the text log into a configuration and typed events
//! - Engine: the table allocation state machine
//! - Replay: driving a whole day from opening to the closing report

mod config;
mod engine;
pub mod event;
pub mod input;
pub mod record;
mod replay;
pub mod time;
pub mod types;

pub use config::{ClubConfig, ConfigError};
pub use engine::{ClientStatus, ClosingReport, Club, EngineError, Step, StepStatus};
pub use event::{Event, EventKind};
pub use input::{EventLog, ParseError, ParseErrorKind, parse_log};
pub use record::{Fatal, Record, Rejection, TableSummary};
pub use replay::{ReplayError, ReportSink, RunOutcome, RunStats, replay};
pub use time::{ClockTime, TimeError};
pub use types::{ClientName, TableId, ValidationError};
