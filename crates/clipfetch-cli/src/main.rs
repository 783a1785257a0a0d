//! clipfetch CLI - search a sound-effect catalog and grab clips
//!
//! This is the main entry point for the clipfetch command-line interface.
//! Command implementations live in separate modules; this file only wires
//! configuration, logging and the page source together.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clipfetch_core::{Config, FixturePageSource, HttpPageSource, PageSource, Paginator};
use colored::Colorize;

mod cli;
mod commands;
mod error;
mod output;
mod utils;

use cli::{Cli, Commands};
use commands::DownloadSink;
use error::{CliError, exit_code_from_error};
use utils::initialize_logging;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(exit_code_from_error(&err))
        },
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    if let Some(Commands::Completions { shell }) = &cli.command {
        commands::generate_completions(*shell);
        return Ok(());
    }

    let mut config = Config::load().map_err(CliError::usage)?;
    if let Some(dir) = &cli.output_dir {
        config.download.output_dir = Some(dir.clone());
    }

    if cli.mock {
        tracing::debug!("Using the built-in offline catalogue");
        dispatch(FixturePageSource::default(), &cli, &config).await
    } else {
        dispatch(HttpPageSource::new(&config)?, &cli, &config).await
    }
}

async fn dispatch<S: PageSource + 'static>(source: S, cli: &Cli, config: &Config) -> Result<()> {
    let paginator = Paginator::with_config(source, &config.site)?;
    match &cli.command {
        Some(Commands::Search(args)) => commands::search(paginator, args, cli.quiet).await,
        Some(Commands::Completions { .. }) => Ok(()),
        None => {
            let sink = DownloadSink::new(config)?;
            commands::browse(paginator, cli.initial_term(), cli.all, &sink, cli.quiet).await
        },
    }
}
