//! Check command: parse an event log and summarize it without replaying.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::commands::util::load_log;

pub fn run<W: Write>(writer: &mut W, input: &Path) -> Result<()> {
    let log = load_log(input)?;
    let config = &log.config;

    let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
    for event in &log.events {
        *by_kind.entry(event.kind.name()).or_default() += 1;
    }

    writeln!(writer, "Event log: {}", input.display())?;
    writeln!(writer, "Tables: {}", config.table_count())?;
    writeln!(writer, "Hours: {}-{}", config.open_time(), config.close_time())?;
    writeln!(writer, "Hourly rate: {}", config.hourly_rate())?;
    writeln!(writer, "Events: {}", log.events.len())?;
    for (kind, count) in by_kind {
        writeln!(writer, "- {kind}: {count}")?;
    }

    Ok(())
}
