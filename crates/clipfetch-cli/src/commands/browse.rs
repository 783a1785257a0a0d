//! Interactive browsing: one page at a time, or everything at once with `--all`.

use anyhow::Result;
use clipfetch_core::selection::{parse_selections, selection_value};
use clipfetch_core::{
    NavigationAction, Outcome, PageResult, PageSource, Paginator, PaginatorState, SoundRecord,
};
use colored::Colorize;
use inquire::{MultiSelect, Select};

use super::actions;
use super::download::DownloadSink;
use crate::error::CliError;
use crate::output::{ProgressDisplay, found_message, pagination_info};
use crate::utils::prompt::{DEFAULT_SEARCH_TERM, MenuItem, ask_search_term, is_cancellation};

/// Next thing the session should ask the paginator for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Submit(String),
    FetchAll(String),
    Navigate(NavigationAction),
    Retry,
}

/// What the user picked from a page menu.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PageChoice {
    Navigate(NavigationAction),
    Sound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    Retry,
    NewSearch,
    Exit,
}

impl std::fmt::Display for Recovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Retry => "🔁 Retry",
            Self::NewSearch => "🔍 Try a new search",
            Self::Exit => "🚪 Exit",
        })
    }
}

/// Run an interactive session until the user acts on a clip or leaves.
pub async fn execute<S: PageSource + 'static>(
    paginator: Paginator<S>,
    initial_term: Option<String>,
    fetch_all: bool,
    sink: &DownloadSink,
    quiet: bool,
) -> Result<()> {
    match run(paginator, initial_term, fetch_all, sink, quiet).await {
        Err(err) if is_cancellation(&err) => {
            println!("👋 see ya!");
            Ok(())
        },
        other => other,
    }
}

async fn run<S: PageSource + 'static>(
    mut paginator: Paginator<S>,
    initial_term: Option<String>,
    fetch_all: bool,
    sink: &DownloadSink,
    quiet: bool,
) -> Result<()> {
    let mut term = match initial_term {
        Some(term) => term,
        None => ask_search_term(DEFAULT_SEARCH_TERM)?,
    };
    let mut step = if fetch_all {
        Step::FetchAll(term.clone())
    } else {
        Step::Submit(term.clone())
    };

    loop {
        let progress = ProgressDisplay::spinner(&progress_message(&step, &paginator), quiet);
        let result = match &step {
            Step::Submit(t) => paginator.submit(t).await.map(Outcome::Page),
            Step::FetchAll(t) => paginator.fetch_all(t).await.map(Outcome::All),
            Step::Navigate(action) => paginator.navigate(*action).await,
            Step::Retry => paginator.retry().await,
        };
        progress.finish_and_clear();

        match result {
            Ok(Outcome::Page(page)) => {
                println!(
                    "{}",
                    pagination_info(page.current_page, page.records.len(), page.has_next_page)
                );
                match choose_from_page(&page)? {
                    PageChoice::Navigate(action) => step = Step::Navigate(action),
                    PageChoice::Sound(value) => {
                        let selections = parse_selections(&[value])?;
                        return actions::choose_and_perform(&selections, sink, quiet).await;
                    },
                }
            },
            Ok(Outcome::All(records)) => {
                println!("{}", found_message(records.len()));
                let selections =
                    parse_selections(&choose_many(&records)?).map_err(CliError::not_found)?;
                return actions::choose_and_perform(&selections, sink, quiet).await;
            },
            Ok(Outcome::Reset) => {
                term = ask_search_term(&term)?;
                step = Step::Submit(term.clone());
            },
            Err(err) => {
                eprintln!("{} {err}", "❌ Error loading results:".red());
                match choose_recovery(err.is_recoverable())? {
                    Recovery::Retry => step = Step::Retry,
                    Recovery::NewSearch => {
                        abandon_search(&mut paginator)?;
                        term = ask_search_term(&term)?;
                        step = Step::Submit(term.clone());
                    },
                    Recovery::Exit => return Ok(()),
                }
            },
        }
    }
}

/// Drop the current term so a fresh one can be submitted. A search that
/// never got past validation leaves the session idle, with nothing to drop.
fn abandon_search<S: PageSource + 'static>(paginator: &mut Paginator<S>) -> Result<()> {
    if matches!(
        paginator.state(),
        PaginatorState::PageReady(_) | PaginatorState::Failed { .. }
    ) {
        paginator.new_search()?;
    }
    Ok(())
}

fn progress_message<S: PageSource + 'static>(step: &Step, paginator: &Paginator<S>) -> String {
    let current = match paginator.state() {
        PaginatorState::PageReady(page) => page.current_page,
        _ => 1,
    };
    match step {
        Step::Submit(_) => "Loading page 1...".to_string(),
        Step::Navigate(NavigationAction::NextPage) => format!("Loading page {}...", current + 1),
        Step::Navigate(NavigationAction::PrevPage) => {
            format!("Loading page {}...", current.saturating_sub(1).max(1))
        },
        Step::Navigate(NavigationAction::NewSearch) => "Starting over...".to_string(),
        Step::FetchAll(_) | Step::Navigate(NavigationAction::ShowAll) => {
            "Loading all results...".to_string()
        },
        Step::Retry => "Retrying...".to_string(),
    }
}

/// Clips first, then the navigation actions this page allows.
fn page_menu(page: &PageResult) -> Vec<MenuItem> {
    let sounds = page
        .records
        .iter()
        .map(|record| MenuItem::new(format!("{} 🎵", record.label), selection_value(record)));
    let navigation = NavigationAction::ALL
        .into_iter()
        .filter(|action| action.is_enabled(page))
        .map(|action| MenuItem::new(navigation_label(action), action.id()));
    sounds.chain(navigation).collect()
}

const fn navigation_label(action: NavigationAction) -> &'static str {
    match action {
        NavigationAction::PrevPage => "⏮️ Previous page",
        NavigationAction::NextPage => "⏭️ Next page",
        NavigationAction::NewSearch => "🔍 New search",
        NavigationAction::ShowAll => "📋 Show all results",
    }
}

fn classify(value: String) -> PageChoice {
    NavigationAction::from_id(&value).map_or(PageChoice::Sound(value), PageChoice::Navigate)
}

fn choose_from_page(page: &PageResult) -> Result<PageChoice> {
    let picked = Select::new(
        "🎵 Select a sound or choose a navigation option:",
        page_menu(page),
    )
    .prompt()?;
    Ok(classify(picked.value))
}

fn choose_many(records: &[SoundRecord]) -> Result<Vec<String>> {
    let items: Vec<MenuItem> = records
        .iter()
        .map(|record| MenuItem::new(format!("{} 🎵", record.label), selection_value(record)))
        .collect();
    let picked = MultiSelect::new(
        "🎵 Which sounds to download? (space to select, type to filter)",
        items,
    )
    .prompt()?;
    Ok(picked.into_iter().map(|item| item.value).collect())
}

fn recovery_options(recoverable: bool) -> Vec<Recovery> {
    if recoverable {
        vec![Recovery::Retry, Recovery::NewSearch, Recovery::Exit]
    } else {
        vec![Recovery::NewSearch, Recovery::Exit]
    }
}

fn choose_recovery(recoverable: bool) -> Result<Recovery> {
    Ok(Select::new("What would you like to do?", recovery_options(recoverable)).prompt()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clipfetch_core::{DownloadLink, FixturePageSource};

    fn page(current_page: u32, has_next_page: bool) -> PageResult {
        PageResult::new(
            vec![
                SoundRecord::new(
                    "Bruh",
                    DownloadLink::Resolved("https://www.myinstants.com/media/sounds/bruh.mp3".into()),
                ),
                SoundRecord::new("Ghost", DownloadLink::NotFound),
            ],
            current_page,
            has_next_page,
        )
    }

    #[test]
    fn test_first_page_menu_hides_previous() {
        let values: Vec<String> = page_menu(&page(1, true)).into_iter().map(|i| i.value).collect();
        assert_eq!(
            values,
            [
                "Bruh||https://www.myinstants.com/media/sounds/bruh.mp3",
                "Ghost||not-found",
                "action:next-page",
                "action:new-search",
                "action:show-all",
            ]
        );
    }

    #[test]
    fn test_last_page_menu_hides_next() {
        let values: Vec<String> = page_menu(&page(2, false)).into_iter().map(|i| i.value).collect();
        assert!(values.contains(&"action:prev-page".to_string()));
        assert!(!values.contains(&"action:next-page".to_string()));
    }

    #[test]
    fn test_classify_menu_values() {
        assert_eq!(
            classify("action:show-all".into()),
            PageChoice::Navigate(NavigationAction::ShowAll)
        );
        assert_eq!(
            classify("Bruh||https://a/b.mp3".into()),
            PageChoice::Sound("Bruh||https://a/b.mp3".into())
        );
    }

    #[test]
    fn test_recovery_offers_retry_only_when_recoverable() {
        assert_eq!(recovery_options(true)[0], Recovery::Retry);
        assert!(!recovery_options(false).contains(&Recovery::Retry));
    }

    #[tokio::test]
    async fn test_new_search_after_blank_term_keeps_session_usable() {
        let mut paginator = Paginator::new(FixturePageSource::default());
        assert!(paginator.submit("   ").await.is_err());
        assert_eq!(paginator.state(), &PaginatorState::Idle);

        abandon_search(&mut paginator).unwrap();
        let page = paginator.submit("wilhelm").await.unwrap();
        assert_eq!(page.current_page, 1);
    }

    #[tokio::test]
    async fn test_new_search_after_failed_page_returns_to_idle() {
        let source = FixturePageSource::default();
        source.set_page_failure(1, true);
        let mut paginator = Paginator::new(source);
        assert!(paginator.submit("x").await.is_err());
        assert!(matches!(paginator.state(), PaginatorState::Failed { .. }));

        abandon_search(&mut paginator).unwrap();
        assert_eq!(paginator.state(), &PaginatorState::Idle);
        assert_eq!(paginator.search_term(), None);
    }

    #[tokio::test]
    async fn test_progress_messages_track_page() {
        let mut paginator = Paginator::new(FixturePageSource::default());
        assert_eq!(
            progress_message(&Step::Submit("x".into()), &paginator),
            "Loading page 1..."
        );
        paginator.submit("x").await.unwrap();
        assert_eq!(
            progress_message(&Step::Navigate(NavigationAction::NextPage), &paginator),
            "Loading page 2..."
        );
        assert_eq!(
            progress_message(&Step::FetchAll("x".into()), &paginator),
            "Loading all results..."
        );
    }
}
