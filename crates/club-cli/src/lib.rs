//! Club event log CLI library.
//!
//! This crate provides the CLI interface for replaying club event logs.

mod cli;
pub mod commands;
mod config;
pub mod render;

pub use cli::{Cli, Commands};
pub use config::{Config, OutputFormat};
