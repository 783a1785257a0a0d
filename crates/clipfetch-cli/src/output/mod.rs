//! # Output Formatting
//!
//! Results are printed either for people (`text`, with colors and a
//! pagination summary) or for scripts (`json`):
//!
//! ```bash
//! clipfetch search bruh
//! clipfetch search bruh --format json | jq '.records[].download_url'
//! clipfetch search bruh --all --format json | jq 'length'
//! ```
//!
//! A single page serializes as a `PageResult` object
//! (`records`, `hasNextPage`, `hasPreviousPage`, `currentPage`); an exhaustive
//! run serializes as a flat array of records. Unresolved clips carry
//! `"download_url": "not-found"` in both.

mod json;
mod progress;
mod text;

use anyhow::Result;
use clipfetch_core::{PageResult, SoundRecord};

pub use progress::{ProgressDisplay, plural};
pub use text::{found_message, pagination_info};

use json::JsonFormatter;
use text::TextFormatter;

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing (default)
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Prints search results in the selected format.
pub struct ResultsFormatter {
    format: OutputFormat,
}

impl ResultsFormatter {
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print one page of results.
    pub fn format_page(&self, page: &PageResult) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                TextFormatter::format_page(page);
                Ok(())
            },
            OutputFormat::Json => JsonFormatter::format_page(page),
        }
    }

    /// Print the records of an exhaustive run.
    pub fn format_all(&self, records: &[SoundRecord]) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                TextFormatter::format_all(records);
                Ok(())
            },
            OutputFormat::Json => JsonFormatter::format_records(records),
        }
    }
}
