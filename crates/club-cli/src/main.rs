use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use club_cli::commands::{check, report, run};
use club_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout carries only replay output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Run { input, json }) => {
            let input = config.input_or_default(input.as_deref());
            run::run(&mut out, &input, config.format_with(*json))?;
        }
        Some(Commands::Report { input, json }) => {
            let input = config.input_or_default(input.as_deref());
            report::run(&mut out, &input, *json)?;
        }
        Some(Commands::Check { input }) => {
            let input = config.input_or_default(input.as_deref());
            check::run(&mut out, &input)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
