//! Output sinks and report formatting.

use std::fmt::Write as _;
use std::io::{self, Write};

use club_core::{ClientName, ClockTime, ClosingReport, ClubConfig, Record, ReportSink, TableSummary};
use serde::Serialize;

/// Writes each record as its plain output line.
pub struct TextSink<W> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    type Error = io::Error;

    fn emit(&mut self, record: &Record) -> Result<(), Self::Error> {
        writeln!(self.writer, "{record}")
    }
}

/// Writes each record as one line of JSON.
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    type Error = io::Error;

    fn emit(&mut self, record: &Record) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)
    }
}

/// Closing report as emitted by `club report --json`.
#[derive(Debug, Serialize)]
pub struct ReportJson<'a> {
    pub open_time: ClockTime,
    pub close_time: ClockTime,
    pub hourly_rate: u32,
    pub tables: &'a [TableSummary],
    pub total_revenue: u64,
    pub total_minutes: u32,
    pub forced_departures: &'a [ClientName],
}

impl<'a> ReportJson<'a> {
    pub fn new(config: &ClubConfig, report: &'a ClosingReport) -> Self {
        Self {
            open_time: config.open_time(),
            close_time: report.close_time,
            hourly_rate: config.hourly_rate(),
            tables: &report.tables,
            total_revenue: report.total_revenue(),
            total_minutes: report.total_minutes(),
            forced_departures: &report.forced_departures,
        }
    }
}

/// Formats the human-readable closing report.
pub fn format_report(config: &ClubConfig, report: &ClosingReport) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "CLUB REPORT: {}-{}, {} {} at {} per hour",
        config.open_time(),
        config.close_time(),
        config.table_count(),
        if config.table_count() == 1 { "table" } else { "tables" },
        config.hourly_rate()
    )
    .unwrap();
    writeln!(output).unwrap();

    writeln!(output, "{:>5}  {:>7}  {:>6}", "TABLE", "REVENUE", "USAGE").unwrap();
    for table in &report.tables {
        writeln!(
            output,
            "{:>5}  {:>7}  {:>6}",
            table.table.get(),
            table.revenue,
            table.usage()
        )
        .unwrap();
    }
    writeln!(output, "{}", "─".repeat(22)).unwrap();
    writeln!(
        output,
        "{:<5}  {:>7}  {:>6}",
        "TOTAL",
        report.total_revenue(),
        club_core::time::format_hhmm(report.total_minutes())
    )
    .unwrap();

    writeln!(output).unwrap();
    if report.forced_departures.is_empty() {
        writeln!(output, "Nobody was shown out at closing.").unwrap();
    } else {
        let names: Vec<_> = report
            .forced_departures
            .iter()
            .map(ClientName::as_str)
            .collect();
        writeln!(output, "Shown out at closing: {}", names.join(", ")).unwrap();
    }

    output
}

/// Formats the JSON closing report.
pub fn format_report_json(config: &ClubConfig, report: &ClosingReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportJson::new(config, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    use club_core::{Event, EventKind, Rejection, TableId};
    use insta::assert_snapshot;

    fn at(hour: u8, minute: u8) -> ClockTime {
        ClockTime::from_hm(hour, minute).unwrap()
    }

    fn config() -> ClubConfig {
        ClubConfig::new(3, at(9, 0), at(19, 0), 10).unwrap()
    }

    fn summary(table: u32, revenue: u64, minutes: u32) -> TableSummary {
        TableSummary {
            table: TableId::new(table).unwrap(),
            revenue,
            minutes,
        }
    }

    fn sample_report() -> ClosingReport {
        ClosingReport {
            close_time: at(19, 0),
            forced_departures: vec![ClientName::new("client3").unwrap()],
            tables: vec![summary(1, 60, 358), summary(2, 30, 138), summary(3, 90, 481)],
        }
    }

    #[test]
    fn test_report_text() {
        let output = format_report(&config(), &sample_report());
        assert_snapshot!(output, @r"
        CLUB REPORT: 09:00-19:00, 3 tables at 10 per hour

        TABLE  REVENUE   USAGE
            1       60   05:58
            2       30   02:18
            3       90   08:01
        ──────────────────────
        TOTAL      180   16:17

        Shown out at closing: client3
        ");
    }

    #[test]
    fn test_report_text_without_departures() {
        let report = ClosingReport {
            close_time: at(19, 0),
            forced_departures: vec![],
            tables: vec![summary(1, 0, 0)],
        };
        let output = format_report(&config(), &report);
        assert!(output.ends_with("Nobody was shown out at closing.\n"));
        assert!(output.contains("    1        0   00:00\n"));
    }

    #[test]
    fn test_report_json() {
        let output = format_report_json(&config(), &sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "open_time": "09:00",
                "close_time": "19:00",
                "hourly_rate": 10,
                "tables": [
                    {"table": 1, "revenue": 60, "minutes": 358},
                    {"table": 2, "revenue": 30, "minutes": 138},
                    {"table": 3, "revenue": 90, "minutes": 481},
                ],
                "total_revenue": 180,
                "total_minutes": 977,
                "forced_departures": ["client3"],
            })
        );
    }

    #[test]
    fn test_text_sink_writes_lines() {
        let mut buffer = Vec::new();
        let mut sink = TextSink::new(&mut buffer);
        sink.emit(&Record::Opened { time: at(9, 0) }).unwrap();
        sink.emit(&Record::Rejected {
            time: at(9, 5),
            reason: Rejection::PlaceIsBusy,
        })
        .unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "09:00\n09:05 13 PlaceIsBusy\n");
    }

    #[test]
    fn test_json_sink_writes_one_object_per_line() {
        let mut buffer = Vec::new();
        let mut sink = JsonLinesSink::new(&mut buffer);
        let event = Event::new("09:10", ClientName::new("bob").unwrap(), EventKind::WaitForTable);
        sink.emit(&Record::Echo { event }).unwrap();
        sink.emit(&Record::ForcedDeparture {
            time: at(9, 10),
            client: ClientName::new("bob").unwrap(),
        })
        .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_snapshot!(output, @r#"
        {"record":"echo","event":{"time":"09:10","client":"bob","kind":"wait_for_table"}}
        {"record":"forced_departure","time":"09:10","client":"bob"}
        "#);
    }
}
