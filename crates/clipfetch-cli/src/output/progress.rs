//! Progress display utilities

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinners for page loads and downloads.
///
/// Spinners draw to stderr and are hidden when `quiet` is set, so stdout
/// only ever carries results.
pub struct ProgressDisplay;

impl ProgressDisplay {
    /// Create a ticking spinner with the given message
    pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
        if quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.magenta} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// `"sound"` / `"sounds"` style pluralization.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
