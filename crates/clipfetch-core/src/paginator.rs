//! Pagination state machine for one browsing session.
//!
//! ```text
//!            submit                next / prev
//!   Idle ───────────▶ Loading ◀──────────────┐
//!    ▲ │                 │ ok                 │
//!    │ │ fetch_all       ▼                    │
//!    │ │            PageReady ────────────────┘
//!    │ │                 │ show_all
//!    │ └──────────▶ Exhausting ──── ok ───▶ Done
//!    │                   │ err
//!    │  new_search       ▼
//!    └────────────── Failed ──── retry ───▶ Loading | Exhausting
//! ```
//!
//! Every operation takes `&mut self`, so at most one load is in flight per
//! session. A call the current state does not allow fails with
//! [`Error::InvalidTransition`] before any request is issued.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    aggregate, DetailResolver, Error, NavigationAction, PageCache, PageResult, PageSource, Query,
    RawPage, Result, ResultExtractor, SiteConfig, SoundRecord,
};

/// Where a failed session picks up again on [`Paginator::retry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryTarget {
    /// Reload this page.
    Page(Query),
    /// Re-run the exhaustive load for this term.
    Exhaustive(String),
}

/// Observable state of a [`Paginator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginatorState {
    /// No active search.
    Idle,
    /// A page load is in flight.
    Loading(Query),
    /// A page is loaded and navigable.
    PageReady(PageResult),
    /// Every page of this term is being collected.
    Exhausting(String),
    /// The exhaustive run finished. Terminal.
    Done(Vec<SoundRecord>),
    /// The last load failed.
    Failed {
        /// Human-readable cause.
        message: String,
        /// What [`Paginator::retry`] will re-run.
        retry: RetryTarget,
    },
}

impl PaginatorState {
    /// Short name used in transition errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading(_) => "loading a page",
            Self::PageReady(_) => "showing a page",
            Self::Exhausting(_) => "fetching all pages",
            Self::Done(_) => "done",
            Self::Failed { .. } => "failed",
        }
    }
}

/// What a transition produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A single page is ready.
    Page(PageResult),
    /// The exhaustive run produced every record.
    All(Vec<SoundRecord>),
    /// The session is back to [`PaginatorState::Idle`].
    Reset,
}

/// Drives fetching, extraction, resolution and aggregation for one session.
///
/// ```rust,no_run
/// use clipfetch_core::{FixturePageSource, Paginator};
///
/// # async fn demo() -> clipfetch_core::Result<()> {
/// let mut paginator = Paginator::new(FixturePageSource::default());
/// let first = paginator.submit("wilhelm scream").await?;
/// if first.has_next_page {
///     let second = paginator.next().await?;
///     assert_eq!(second.current_page, 2);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Paginator<S: PageSource + 'static> {
    source: Arc<S>,
    extractor: ResultExtractor,
    resolver: DetailResolver,
    cache: PageCache,
    state: PaginatorState,
    term: Option<String>,
}

impl<S: PageSource + 'static> Paginator<S> {
    /// Session over `source` with the default selectors.
    pub fn new(source: S) -> Self {
        Self::with_parts(
            Arc::new(source),
            ResultExtractor::default(),
            crate::config::DEFAULT_AUDIO_EXTENSION,
        )
    }

    /// Session over `source` using the site's configured selector and extension.
    pub fn with_config(source: S, site: &SiteConfig) -> Result<Self> {
        let extractor = ResultExtractor::new(&site.result_selector)?;
        Ok(Self::with_parts(
            Arc::new(source),
            extractor,
            &site.audio_extension,
        ))
    }

    fn with_parts(source: Arc<S>, extractor: ResultExtractor, audio_extension: &str) -> Self {
        let resolver = DetailResolver::new(source.clone(), audio_extension);
        Self {
            source,
            extractor,
            resolver,
            cache: PageCache::new(),
            state: PaginatorState::Idle,
            term: None,
        }
    }

    /// Current state.
    pub const fn state(&self) -> &PaginatorState {
        &self.state
    }

    /// The active search term, if any.
    pub fn search_term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// The session's page cache.
    pub const fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// The page source this session reads from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Start browsing `term` from page 1.
    pub async fn submit(&mut self, term: &str) -> Result<PageResult> {
        self.submit_at(term, 1).await
    }

    /// Start browsing `term` at an arbitrary page.
    pub async fn submit_at(&mut self, term: &str, page: u32) -> Result<PageResult> {
        self.require(matches!(self.state, PaginatorState::Idle), "submit a search")?;
        let query = Query::with_page(term, page)?;
        self.cache.invalidate(query.search_term());
        self.term = Some(query.search_term().to_string());
        self.load_page(query).await
    }

    /// Load the page after the current one.
    pub async fn next(&mut self) -> Result<PageResult> {
        let query = match &self.state {
            PaginatorState::PageReady(page) if page.has_next_page => {
                self.page_query(page.current_page.saturating_add(1))?
            },
            PaginatorState::PageReady(_) => {
                return Err(transition("on the last page", "load the next page"));
            },
            state => return Err(transition(state.name(), "load the next page")),
        };
        self.load_page(query).await
    }

    /// Load the page before the current one.
    pub async fn prev(&mut self) -> Result<PageResult> {
        let query = match &self.state {
            PaginatorState::PageReady(page) if page.has_previous_page => {
                self.page_query(page.current_page - 1)?
            },
            PaginatorState::PageReady(_) => {
                return Err(transition("on the first page", "load the previous page"));
            },
            state => return Err(transition(state.name(), "load the previous page")),
        };
        self.load_page(query).await
    }

    /// Abandon the current term and purge its cached pages.
    pub fn new_search(&mut self) -> Result<()> {
        self.require(
            matches!(
                self.state,
                PaginatorState::PageReady(_) | PaginatorState::Failed { .. }
            ),
            "start a new search",
        )?;
        if let Some(term) = self.term.take() {
            self.cache.invalidate(&term);
        }
        self.state = PaginatorState::Idle;
        Ok(())
    }

    /// Collect every page of the current term.
    pub async fn show_all(&mut self) -> Result<Vec<SoundRecord>> {
        self.require(
            matches!(self.state, PaginatorState::PageReady(_)),
            "show all results",
        )?;
        let term = self.active_term()?;
        self.run_exhaustive(term).await
    }

    /// Collect every page of `term` without browsing it first.
    pub async fn fetch_all(&mut self, term: &str) -> Result<Vec<SoundRecord>> {
        self.require(matches!(self.state, PaginatorState::Idle), "fetch all results")?;
        let query = Query::new(term)?;
        let term = query.search_term().to_string();
        self.cache.invalidate(&term);
        self.term = Some(term.clone());
        self.run_exhaustive(term).await
    }

    /// Re-run whatever load failed last.
    pub async fn retry(&mut self) -> Result<Outcome> {
        let target = match &self.state {
            PaginatorState::Failed { retry, .. } => retry.clone(),
            state => return Err(transition(state.name(), "retry")),
        };
        match target {
            RetryTarget::Page(query) => self.load_page(query).await.map(Outcome::Page),
            RetryTarget::Exhaustive(term) => self.run_exhaustive(term).await.map(Outcome::All),
        }
    }

    /// Apply a navigation choice from the front end.
    pub async fn navigate(&mut self, action: NavigationAction) -> Result<Outcome> {
        match action {
            NavigationAction::PrevPage => self.prev().await.map(Outcome::Page),
            NavigationAction::NextPage => self.next().await.map(Outcome::Page),
            NavigationAction::NewSearch => self.new_search().map(|()| Outcome::Reset),
            NavigationAction::ShowAll => self.show_all().await.map(Outcome::All),
        }
    }

    #[instrument(skip_all, fields(term = %query.search_term(), page = query.page()))]
    async fn load_page(&mut self, query: Query) -> Result<PageResult> {
        self.state = PaginatorState::Loading(query.clone());
        match self.build_page(&query).await {
            Ok(page) => {
                info!(
                    "Loaded page {} with {} result(s)",
                    page.current_page,
                    page.records.len()
                );
                self.state = PaginatorState::PageReady(page.clone());
                Ok(page)
            },
            Err(e) => {
                self.state = PaginatorState::Failed {
                    message: e.to_string(),
                    retry: RetryTarget::Page(query),
                };
                Err(e)
            },
        }
    }

    async fn build_page(&mut self, query: &Query) -> Result<PageResult> {
        let raw = self.cached_or_fetch(query).await?;
        let stubs = self.extractor.extract(&raw);
        let (links, has_next) = futures::join!(
            self.resolver.resolve_all(&stubs),
            self.source.has_next(query)
        );
        let records = aggregate(stubs, links)?;
        Ok(PageResult::new(records, query.page(), has_next))
    }

    #[instrument(skip(self))]
    async fn run_exhaustive(&mut self, term: String) -> Result<Vec<SoundRecord>> {
        self.state = PaginatorState::Exhausting(term.clone());
        match self.collect_all(&term).await {
            Ok(records) => {
                info!("Collected {} result(s) for '{}'", records.len(), term);
                self.cache.clear();
                self.state = PaginatorState::Done(records.clone());
                Ok(records)
            },
            Err(e) => {
                self.state = PaginatorState::Failed {
                    message: e.to_string(),
                    retry: RetryTarget::Exhaustive(term),
                };
                Err(e)
            },
        }
    }

    async fn collect_all(&mut self, term: &str) -> Result<Vec<SoundRecord>> {
        let mut query = Query::new(term)?;
        let mut stubs = Vec::new();
        loop {
            let raw = self.cached_or_fetch(&query).await?;
            let page_stubs = self.extractor.extract(&raw);
            if page_stubs.is_empty() {
                debug!("Page {} is empty, stopping", query.page());
                break;
            }
            stubs.extend(page_stubs);
            if !self.source.has_next(&query).await {
                break;
            }
            query = query.next();
        }

        let links = self.resolver.resolve_all(&stubs).await;
        aggregate(stubs, links)
    }

    async fn cached_or_fetch(&mut self, query: &Query) -> Result<RawPage> {
        if let Some(raw) = self.cache.get(query.search_term(), query.page()) {
            return Ok(raw);
        }
        let raw = self.source.fetch_page(query).await?;
        debug!(
            "Fetched page {} for '{}' ({} bytes)",
            query.page(),
            query.search_term(),
            raw.markup().len()
        );
        self.cache.put(query.search_term(), query.page(), raw.clone());
        Ok(raw)
    }

    fn page_query(&self, page: u32) -> Result<Query> {
        Query::with_page(self.active_term()?, page)
    }

    fn active_term(&self) -> Result<String> {
        self.term
            .clone()
            .ok_or_else(|| transition(self.state.name(), "continue without a search term"))
    }

    fn require(&self, allowed: bool, action: &'static str) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(transition(self.state.name(), action))
        }
    }
}

const fn transition(state: &'static str, action: &'static str) -> Error {
    Error::InvalidTransition { state, action }
}
