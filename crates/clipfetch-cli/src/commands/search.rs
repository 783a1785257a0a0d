//! Search command implementation

use anyhow::Result;
use clipfetch_core::{PageSource, Paginator};

use crate::cli::SearchArgs;
use crate::output::{OutputFormat, ProgressDisplay, ResultsFormatter};

/// List one page (or every page with `--all`) for a term and print it.
pub async fn execute<S: PageSource + 'static>(
    mut paginator: Paginator<S>,
    args: &SearchArgs,
    quiet: bool,
) -> Result<()> {
    let term = args.term();
    let formatter = ResultsFormatter::new(args.format);
    let hide_spinner = quiet || args.format == OutputFormat::Json;

    if args.all {
        let progress = ProgressDisplay::spinner("Loading all results...", hide_spinner);
        let records = paginator.fetch_all(&term).await;
        progress.finish_and_clear();
        formatter.format_all(&records?)
    } else {
        let progress =
            ProgressDisplay::spinner(&format!("Loading page {}...", args.page), hide_spinner);
        let page = paginator.submit_at(&term, args.page).await;
        progress.finish_and_clear();
        formatter.format_page(&page?)
    }
}
