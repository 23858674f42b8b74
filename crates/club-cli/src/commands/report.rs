//! Report command: replay silently and print the closing revenue report.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use club_core::{Record, RunOutcome, replay};

use crate::commands::util::load_log;
use crate::render::{format_report, format_report_json};

pub fn run<W: Write>(writer: &mut W, input: &Path, json: bool) -> Result<()> {
    let log = load_log(input)?;
    let config = log.config.clone();

    let mut records: Vec<Record> = Vec::new();
    let (outcome, _stats) = replay(log.config, log.events, &mut records)?;

    match outcome {
        RunOutcome::Completed(report) => {
            if json {
                writeln!(writer, "{}", format_report_json(&config, &report)?)?;
            } else {
                write!(writer, "{}", format_report(&config, &report))?;
            }
        }
        RunOutcome::Halted {
            error,
            events_processed,
        } => {
            writeln!(
                writer,
                "Replay stopped at event {events_processed} ({error}); no closing report."
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn write_log(dir: &Path, text: &str) -> std::path::PathBuf {
        let path = dir.join("input.txt");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_report_for_single_table_day() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_log(
            temp.path(),
            "1\n09:00 19:00\n10\n\
             09:00 1 Alice\n09:05 2 Alice 1\n09:10 1 Bob\n09:15 3 Bob\n09:20 4 Alice\n",
        );

        let mut output = Vec::new();
        run(&mut output, &path, false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        CLUB REPORT: 09:00-19:00, 1 table at 10 per hour

        TABLE  REVENUE   USAGE
            1      100   09:55
        ──────────────────────
        TOTAL      100   09:55

        Shown out at closing: Bob
        ");
    }

    #[test]
    fn test_report_json_totals() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_log(
            temp.path(),
            "2\n09:00 19:00\n10\n09:00 1 a\n09:00 2 a 2\n11:30 4 a\n",
        );

        let mut output = Vec::new();
        run(&mut output, &path, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["total_revenue"], 30);
        assert_eq!(value["total_minutes"], 150);
        assert_eq!(value["forced_departures"], serde_json::json!([]));
    }

    #[test]
    fn test_report_after_fatal_event() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_log(temp.path(), "1\n09:00 19:00\n10\n25:00 1 a\n");

        let mut output = Vec::new();
        run(&mut output, &path, false).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Replay stopped at event 1 (IncorrectFormat); no closing report.\n"
        );
    }
}
