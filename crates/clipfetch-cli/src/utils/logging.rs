//! Logging initialization and configuration.
//!
//! This module handles setting up the tracing subscriber and color control
//! based on CLI flags and environment variables.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};
use crate::output::OutputFormat;

/// Initialize the logging subsystem based on CLI flags.
///
/// Sets the log level based on verbosity flags and suppresses warnings when
/// machine-readable output is requested.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let mut level = log_level(cli);

    // JSON on stdout stays parseable; only errors reach stderr unless -v was given.
    let machine_output = !cli.verbose && wants_json(cli);
    if machine_output {
        level = Level::ERROR;
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Color control: disable when requested, NO_COLOR is set, or when emitting machine output
    let env_no_color = std::env::var("NO_COLOR").ok().is_some();
    if cli.no_color || env_no_color || machine_output {
        color_control::set_override(false);
    }
    Ok(())
}

const fn log_level(cli: &Cli) -> Level {
    if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    }
}

fn wants_json(cli: &Cli) -> bool {
    matches!(
        &cli.command,
        Some(Commands::Search(args)) if args.format == OutputFormat::Json
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_levels_follow_flags() {
        assert_eq!(log_level(&parse(&["clipfetch"])), Level::WARN);
        assert_eq!(log_level(&parse(&["clipfetch", "-v"])), Level::DEBUG);
        assert_eq!(log_level(&parse(&["clipfetch", "-q"])), Level::ERROR);
    }

    #[test]
    fn test_json_search_is_machine_output() {
        assert!(wants_json(&parse(&["clipfetch", "search", "x", "-f", "json"])));
        assert!(!wants_json(&parse(&["clipfetch", "search", "x"])));
        assert!(!wants_json(&parse(&["clipfetch", "x"])));
    }
}
