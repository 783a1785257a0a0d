//! JSON output formatting

use anyhow::Result;
use clipfetch_core::{PageResult, SoundRecord};

pub struct JsonFormatter;

impl JsonFormatter {
    /// Print a page with its navigation flags
    pub fn format_page(page: &PageResult) -> Result<()> {
        let json = serde_json::to_string_pretty(page)?;
        println!("{json}");
        Ok(())
    }

    /// Print records as a flat array
    pub fn format_records(records: &[SoundRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        println!("{json}");
        Ok(())
    }
}
