//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Computer club event log replay.
///
/// Replays a day's event log against the club's tables and prints the
/// resulting event stream and per-table revenue.
#[derive(Debug, Parser)]
#[command(name = "club", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay an event log and print every output line.
    Run {
        /// Event log to replay (defaults to the configured input path).
        input: Option<PathBuf>,

        /// Print one JSON object per output line.
        #[arg(long)]
        json: bool,
    },

    /// Replay an event log and print only the closing revenue report.
    Report {
        /// Event log to replay (defaults to the configured input path).
        input: Option<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Parse an event log without replaying it.
    Check {
        /// Event log to check (defaults to the configured input path).
        input: Option<PathBuf>,
    },
}
