//! What to do with chosen clips: download, play or print the URL.

use anyhow::{Context, Result, anyhow};
use clipfetch_core::SoundSelection;
use clipfetch_core::selection::{is_multiple, selection_message};
use inquire::Select;

use super::download::DownloadSink;
use crate::error::CliError;
use crate::output::{ProgressDisplay, plural};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundAction {
    Download,
    Play,
    ShowUrl,
}

impl SoundAction {
    /// Actions offered for a selection. Playing and printing only make
    /// sense for a single clip.
    pub fn available(selections: &[SoundSelection]) -> Vec<Self> {
        if is_multiple(selections) {
            vec![Self::Download]
        } else {
            vec![Self::Download, Self::Play, Self::ShowUrl]
        }
    }
}

impl std::fmt::Display for SoundAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Download => "💾 Download",
            Self::Play => "▶️ Play",
            Self::ShowUrl => "🔗 Show download URL (you can pipe this to other commands)",
        })
    }
}

/// Ask what to do with `selections` and do it.
pub async fn choose_and_perform(
    selections: &[SoundSelection],
    sink: &DownloadSink,
    quiet: bool,
) -> Result<()> {
    let action = Select::new(&selection_message(selections), SoundAction::available(selections))
        .prompt()?;
    perform(action, selections, sink, quiet).await
}

/// Run `action` on `selections`.
pub async fn perform(
    action: SoundAction,
    selections: &[SoundSelection],
    sink: &DownloadSink,
    quiet: bool,
) -> Result<()> {
    match (action, selections.first()) {
        (SoundAction::Download, _) => {
            let progress = ProgressDisplay::spinner(
                &format!("Preparing to download {}...", plural(selections.len(), "file")),
                quiet,
            );
            let report = sink.download_all(selections, &progress).await;
            progress.finish_and_clear();
            report.print_summary();
        },
        (SoundAction::Play, Some(first)) => {
            let url = link_of(first)?;
            open::that(url).with_context(|| format!("Failed to open {url}"))?;
        },
        (SoundAction::ShowUrl, Some(first)) => println!("{}", link_of(first)?),
        (SoundAction::Play | SoundAction::ShowUrl, None) => {},
    }
    Ok(())
}

fn link_of(selection: &SoundSelection) -> Result<&str> {
    if selection.has_link() {
        Ok(&selection.download_url)
    } else {
        Err(CliError::not_found(anyhow!("No download link found for {}", selection.label)).into())
    }
}
