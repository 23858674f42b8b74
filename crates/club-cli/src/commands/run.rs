//! Run command: replay an event log and print every output record.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use club_core::{RunOutcome, replay};

use crate::commands::util::load_log;
use crate::config::OutputFormat;
use crate::render::{JsonLinesSink, TextSink};

/// Replays the log at `input`, writing records to `writer`.
///
/// A run stopped by a fatal event is still a successful command: the error
/// line is part of the output.
pub fn run<W: Write>(writer: &mut W, input: &Path, format: OutputFormat) -> Result<RunOutcome> {
    let log = load_log(input)?;

    let (outcome, stats) = match format {
        OutputFormat::Text => replay(log.config, log.events, &mut TextSink::new(&mut *writer))?,
        OutputFormat::Json => {
            replay(log.config, log.events, &mut JsonLinesSink::new(&mut *writer))?
        }
    };
    writer.flush()?;

    match &outcome {
        RunOutcome::Completed(report) => tracing::info!(
            accepted = stats.accepted,
            rejected = stats.rejected,
            revenue = report.total_revenue(),
            "replay finished"
        ),
        RunOutcome::Halted {
            error,
            events_processed,
        } => tracing::warn!(%error, events_processed, "replay stopped by fatal event"),
    }
    Ok(outcome)
}
