//! Text output formatting

use clipfetch_core::{PageResult, SoundRecord};
use colored::Colorize;

use super::plural;

pub struct TextFormatter;

impl TextFormatter {
    /// Print the page summary followed by one line per clip
    pub fn format_page(page: &PageResult) {
        println!(
            "{}",
            pagination_info(page.current_page, page.records.len(), page.has_next_page)
        );
        Self::print_records(&page.records);
    }

    /// Print the total followed by one line per clip
    pub fn format_all(records: &[SoundRecord]) {
        println!("{}", found_message(records.len()));
        Self::print_records(records);
    }

    fn print_records(records: &[SoundRecord]) {
        for record in records {
            println!("{}", record_line(record));
        }
    }
}

/// Summary line shown above a page of results.
pub fn pagination_info(current_page: u32, count: usize, has_next_page: bool) -> String {
    let page_info = if has_next_page {
        format!("Page {current_page}")
    } else {
        format!("Page {current_page} (last page)")
    };
    format!("🎉 {page_info}: {}!", plural(count, "sound"))
}

/// Summary line shown after an exhaustive run.
pub fn found_message(count: usize) -> String {
    format!("🎉 Found {}!", plural(count, "sound"))
}

fn record_line(record: &SoundRecord) -> String {
    let link = if record.download.is_resolved() {
        record.download.as_str().cyan()
    } else {
        record.download.as_str().dimmed()
    };
    format!("{}  {}", record.label.bold(), link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipfetch_core::DownloadLink;

    #[test]
    fn test_pagination_info() {
        assert_eq!(pagination_info(1, 6, true), "🎉 Page 1: 6 sounds!");
        assert_eq!(pagination_info(3, 1, false), "🎉 Page 3 (last page): 1 sound!");
    }

    #[test]
    fn test_found_message() {
        assert_eq!(found_message(14), "🎉 Found 14 sounds!");
        assert_eq!(found_message(0), "🎉 Found 0 sounds!");
    }

    #[test]
    fn test_record_line_shows_placeholder() {
        colored::control::set_override(false);
        let line = record_line(&SoundRecord::new("Ghost", DownloadLink::NotFound));
        assert_eq!(line, "Ghost  not-found");
    }
}
