//! Drives a whole run: opening line, every event in order, then closing.

use std::convert::Infallible;

use thiserror::Error;

use crate::config::ClubConfig;
use crate::engine::{Club, ClosingReport, EngineError, StepStatus};
use crate::event::Event;
use crate::record::{Fatal, Record};

/// Receives output records in order.
///
/// This allows replay to write to different destinations (e.g., a text
/// stream, JSON lines, or a `Vec` in tests).
pub trait ReportSink {
    type Error;

    fn emit(&mut self, record: &Record) -> Result<(), Self::Error>;
}

impl ReportSink for Vec<Record> {
    type Error = Infallible;

    fn emit(&mut self, record: &Record) -> Result<(), Self::Error> {
        self.push(record.clone());
        Ok(())
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every event was processed and the day was closed.
    Completed(ClosingReport),
    /// A fatal error stopped the run; no closing block was produced.
    Halted {
        error: Fatal,
        /// Events consumed, including the one that failed.
        events_processed: usize,
    },
}

/// Per-status counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub accepted: usize,
    pub ignored: usize,
    pub turned_away: usize,
    pub rejected: usize,
}

impl RunStats {
    fn record(&mut self, status: StepStatus) {
        match status {
            StepStatus::Accepted => self.accepted += 1,
            StepStatus::Ignored => self.ignored += 1,
            StepStatus::TurnedAway => self.turned_away += 1,
            StepStatus::Rejected(_) => self.rejected += 1,
            StepStatus::Fatal(_) => {}
        }
    }
}

#[derive(Debug, Error)]
pub enum ReplayError<E> {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to write output record")]
    Sink(#[source] E),
}

/// Replays `events` against a fresh club and streams every output record to
/// `sink`.
///
/// A fatal event ends the run right after its error line; events after it
/// are never pulled from the iterator.
pub fn replay<I, S>(
    config: ClubConfig,
    events: I,
    sink: &mut S,
) -> Result<(RunOutcome, RunStats), ReplayError<S::Error>>
where
    I: IntoIterator<Item = Event>,
    S: ReportSink,
{
    let mut club = Club::new(config);
    let mut stats = RunStats::default();
    sink.emit(&club.opening()).map_err(ReplayError::Sink)?;

    for (index, event) in events.into_iter().enumerate() {
        let step = club.apply(&event)?;
        for record in &step.records {
            sink.emit(record).map_err(ReplayError::Sink)?;
        }

        if let StepStatus::Fatal(error) = step.status {
            return Ok((
                RunOutcome::Halted {
                    error,
                    events_processed: index + 1,
                },
                stats,
            ));
        }
        stats.record(step.status);
    }

    let report = club.close()?;
    for record in report.records() {
        sink.emit(&record).map_err(ReplayError::Sink)?;
    }
    tracing::debug!(?stats, revenue = report.total_revenue(), "replay completed");

    Ok((RunOutcome::Completed(report), stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::time::ClockTime;
    use crate::types::ClientName;

    fn config(tables: u32) -> ClubConfig {
        ClubConfig::new(
            tables,
            ClockTime::from_hm(9, 0).unwrap(),
            ClockTime::from_hm(19, 0).unwrap(),
            10,
        )
        .unwrap()
    }

    fn event(time: &str, name: &str, kind: EventKind) -> Event {
        Event::new(time, ClientName::new(name).unwrap(), kind)
    }

    fn lines(records: &[Record]) -> Vec<String> {
        records.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn completed_run_emits_opening_events_and_closing() {
        let events = vec![
            event("09:00", "alice", EventKind::Arrival),
            event(
                "09:00",
                "alice",
                EventKind::Sit { table: 2 },
            ),
            event("11:30", "alice", EventKind::Departure),
        ];
        let mut sink = Vec::new();
        let (outcome, stats) = replay(config(2), events, &mut sink).unwrap();

        assert_eq!(
            lines(&sink),
            [
                "09:00",
                "09:00 1 alice",
                "09:00 2 alice 2",
                "11:30 4 alice",
                "19:00",
                "1 0 00:00",
                "2 30 02:30",
            ]
        );
        assert_eq!(stats.accepted, 3);
        let RunOutcome::Completed(report) = outcome else {
            panic!("expected completed run, got {outcome:?}");
        };
        assert_eq!(report.total_revenue(), 30);
    }

    #[test]
    fn fatal_event_stops_before_consuming_the_rest() {
        let mut pulled = 0;
        let events = [
            event("09:00", "alice", EventKind::Arrival),
            event("09:1O", "bob", EventKind::Arrival),
            event("09:20", "carol", EventKind::Arrival),
        ]
        .into_iter()
        .inspect(|_| pulled += 1);

        let mut sink = Vec::new();
        let (outcome, stats) = replay(config(1), events, &mut sink).unwrap();

        assert_eq!(
            lines(&sink),
            ["09:00", "09:00 1 alice", "09:1O 1 bob", "09:1O 13 IncorrectFormat"]
        );
        assert_eq!(
            outcome,
            RunOutcome::Halted {
                error: Fatal::IncorrectFormat,
                events_processed: 2,
            }
        );
        assert_eq!(stats.accepted, 1);
        assert_eq!(pulled, 2);
    }

    #[test]
    fn stats_count_each_outcome() {
        let events = vec![
            event("08:00", "early", EventKind::Arrival),
            event("09:00", "a", EventKind::Arrival),
            event(
                "09:00",
                "a",
                EventKind::Sit { table: 1 },
            ),
            event("09:01", "b", EventKind::WaitForTable),
            event("09:02", "b", EventKind::WaitForTable),
            event("09:03", "c", EventKind::WaitForTable),
        ];
        let mut sink = Vec::new();
        let (_, stats) = replay(config(1), events, &mut sink).unwrap();

        assert_eq!(
            stats,
            RunStats {
                accepted: 3,
                ignored: 1,
                turned_away: 1,
                rejected: 1,
            }
        );
    }

    struct FailingSink;

    impl ReportSink for FailingSink {
        type Error = std::io::Error;

        fn emit(&mut self, _record: &Record) -> Result<(), Self::Error> {
            Err(std::io::Error::other("closed pipe"))
        }
    }

    #[test]
    fn sink_errors_are_propagated() {
        let err = replay(config(1), Vec::<Event>::new(), &mut FailingSink).unwrap_err();
        assert!(matches!(err, ReplayError::Sink(_)));
    }
}
