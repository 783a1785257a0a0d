//! # CLI Structure and Argument Parsing
//!
//! Without a subcommand `clipfetch` starts an interactive session: it asks
//! for a search term (or takes it from the positional arguments), shows one
//! page of clips at a time and lets you download, play or print a clip.
//!
//! ```bash
//! # Interactive browsing
//! clipfetch
//! clipfetch wilhelm scream
//!
//! # Collect every page first, then pick several clips
//! clipfetch --all bruh
//!
//! # Non-interactive listing
//! clipfetch search "air horn" --page 2
//! clipfetch search "air horn" --all --format json
//! ```
//!
//! `--mock` swaps the live site for a built-in catalogue so the whole flow
//! can be exercised offline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::output::OutputFormat;

/// Main CLI structure for the `clipfetch` command
#[derive(Parser, Clone, Debug)]
#[command(name = "clipfetch")]
#[command(version)]
#[command(about = "clipfetch - search and download sound-effect clips", long_about = None)]
#[command(
    override_usage = "clipfetch [QUERY]... [--all] [OPTIONS]\n       clipfetch <COMMAND> [COMMAND_ARGS]... [OPTIONS]"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Search term for the interactive session (prompted for when omitted)
    #[arg(value_name = "QUERY", trailing_var_arg = true)]
    pub query: Vec<String>,

    /// Load every page before choosing, and allow picking several clips
    #[arg(long)]
    pub all: bool,

    /// Use the built-in offline catalogue instead of the live site
    #[arg(long, global = true)]
    pub mock: bool,

    /// Directory downloads are written to (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Term for the interactive session, or `None` to prompt for one.
    ///
    /// Runs of whitespace collapse to one space; positional words that are
    /// all blank count as no term at all.
    pub fn initial_term(&self) -> Option<String> {
        let words: Vec<&str> = self.query.iter().flat_map(|w| w.split_whitespace()).collect();
        (!words.is_empty()).then(|| words.join(" "))
    }
}

/// Subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// List clips for a search term without prompting
    Search(SearchArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `clipfetch search`
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Search term
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Page to show (1-based)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Collect every page into one sorted list
    #[arg(long, conflicts_with = "page")]
    pub all: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl SearchArgs {
    /// The search term as typed, words joined by single spaces.
    pub fn term(&self) -> String {
        self.query.join(" ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_query_without_subcommand() {
        let cli = Cli::try_parse_from(["clipfetch", "wilhelm", "scream", "--all"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.query, ["wilhelm", "scream"]);
        assert!(cli.all);
    }

    #[test]
    fn test_blank_positional_query_prompts_instead() {
        let cli = Cli::try_parse_from(["clipfetch", "   "]).unwrap();
        assert_eq!(cli.initial_term(), None);

        let cli = Cli::try_parse_from(["clipfetch"]).unwrap();
        assert_eq!(cli.initial_term(), None);

        let cli = Cli::try_parse_from(["clipfetch", " air ", "horn"]).unwrap();
        assert_eq!(cli.initial_term().as_deref(), Some("air horn"));
    }

    #[test]
    fn test_search_subcommand() {
        let cli = Cli::try_parse_from([
            "clipfetch", "search", "air", "horn", "--page", "2", "--format", "json", "--mock",
        ])
        .unwrap();
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.term(), "air horn");
        assert_eq!(args.page, 2);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(cli.mock);
    }

    #[test]
    fn test_search_rejects_page_zero_and_all_with_page() {
        assert!(Cli::try_parse_from(["clipfetch", "search", "x", "--page", "0"]).is_err());
        assert!(Cli::try_parse_from(["clipfetch", "search", "x", "--page", "2", "--all"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["clipfetch", "-q", "-v"]).is_err());
    }
}
