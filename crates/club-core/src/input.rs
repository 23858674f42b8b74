//! Text event log reader.
//!
//! The log starts with a header (table count, opening and closing time,
//! hourly rate), read as four whitespace-separated tokens that may span
//! lines. Every following non-blank line is one event:
//!
//! ```text
//! <time> <code> <client> [<table>]
//! ```
//!
//! Only structure is checked here. Event timestamps are passed through as
//! raw text, and any integer is accepted as an event code or table number:
//! rejecting those is part of replay, after the event has been echoed.

use std::str::FromStr;

use thiserror::Error;

use crate::config::{ClubConfig, ConfigError};
use crate::event::{Event, EventKind};
use crate::time::{ClockTime, TimeError};
use crate::types::{ClientName, ValidationError};

const HEADER_FIELDS: [&str; 4] = ["table count", "opening time", "closing time", "hourly rate"];

/// A parsed log: venue configuration plus events in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub config: ClubConfig,
    pub events: Vec<Event>,
}

/// A log that could not be read, with the 1-based line where reading
/// stopped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid {field}: {value:?} is not a valid number")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unexpected trailing field {0:?}")]
    Trailing(String),
}

/// Parses a complete event log.
pub fn parse_log(text: &str) -> Result<EventLog, ParseError> {
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

    let mut header: Vec<(usize, &str)> = Vec::with_capacity(HEADER_FIELDS.len());
    let mut last_line = 0;
    while header.len() < HEADER_FIELDS.len() {
        let Some((number, line)) = lines.next() else {
            return Err(ParseError {
                line: last_line,
                kind: ParseErrorKind::Missing(HEADER_FIELDS[header.len()]),
            });
        };
        last_line = number;
        for token in line.split_whitespace() {
            if header.len() == HEADER_FIELDS.len() {
                return Err(ParseError {
                    line: number,
                    kind: ParseErrorKind::Trailing(token.to_string()),
                });
            }
            header.push((number, token));
        }
    }
    let config = parse_header(&header)?;

    let mut events = Vec::new();
    for (number, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let event = parse_event(line).map_err(|kind| ParseError { line: number, kind })?;
        events.push(event);
    }

    tracing::debug!(
        tables = config.table_count(),
        events = events.len(),
        "parsed event log"
    );
    Ok(EventLog { config, events })
}

fn parse_header(tokens: &[(usize, &str)]) -> Result<ClubConfig, ParseError> {
    let &[(count_line, count), (open_line, open), (close_line, close), (rate_line, rate)] = tokens
    else {
        return Err(ParseError {
            line: tokens.last().map_or(0, |&(line, _)| line),
            kind: ParseErrorKind::Missing(HEADER_FIELDS[tokens.len().min(3)]),
        });
    };

    let table_count = parse_number(count, HEADER_FIELDS[0]).map_err(|kind| ParseError {
        line: count_line,
        kind,
    })?;
    let open_time = parse_time(open, open_line)?;
    let close_time = parse_time(close, close_line)?;
    let hourly_rate = parse_number(rate, HEADER_FIELDS[3]).map_err(|kind| ParseError {
        line: rate_line,
        kind,
    })?;

    ClubConfig::new(table_count, open_time, close_time, hourly_rate).map_err(|e| ParseError {
        line: rate_line,
        kind: e.into(),
    })
}

fn parse_time(raw: &str, line: usize) -> Result<ClockTime, ParseError> {
    raw.parse().map_err(|e: TimeError| ParseError {
        line,
        kind: e.into(),
    })
}

/// Parses one event line.
pub fn parse_event(line: &str) -> Result<Event, ParseErrorKind> {
    let mut fields = line.split_whitespace();
    let time = fields.next().ok_or(ParseErrorKind::Missing("event time"))?;
    let code = fields.next().ok_or(ParseErrorKind::Missing("event code"))?;
    let code: i64 = parse_number(code, "event code")?;
    let client = fields.next().ok_or(ParseErrorKind::Missing("client name"))?;
    let client = ClientName::new(client)?;

    let kind = match code {
        EventKind::ARRIVAL => EventKind::Arrival,
        EventKind::SIT => {
            let table = fields.next().ok_or(ParseErrorKind::Missing("table number"))?;
            EventKind::Sit {
                table: parse_number(table, "table number")?,
            }
        }
        EventKind::WAIT_FOR_TABLE => EventKind::WaitForTable,
        EventKind::DEPARTURE => EventKind::Departure,
        code => EventKind::Unknown { code },
    };

    if let Some(extra) = fields.next() {
        return Err(ParseErrorKind::Trailing(extra.to_string()));
    }
    Ok(Event::new(time, client, kind))
}

fn parse_number<T: FromStr>(raw: &str, field: &'static str) -> Result<T, ParseErrorKind> {
    raw.parse().map_err(|_| ParseErrorKind::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}
