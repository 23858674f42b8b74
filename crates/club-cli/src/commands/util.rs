//! Shared utilities for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use club_core::{EventLog, parse_log};

/// Reads and parses the event log at `path`.
pub fn load_log(path: &Path) -> Result<EventLog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event log {}", path.display()))?;
    let log = parse_log(&text)
        .with_context(|| format!("failed to parse event log {}", path.display()))?;
    tracing::debug!(path = %path.display(), events = log.events.len(), "loaded event log");
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_log_reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.txt");
        let err = load_log(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to read event log"));
    }

    #[test]
    fn test_load_log_reports_parse_error_with_line() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bad.txt");
        std::fs::write(&path, "2\n09:00 19:00\n10\n09:00 x alice\n").unwrap();

        let err = load_log(&path).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("line 4: invalid event code"), "got: {chain}");
    }
}
