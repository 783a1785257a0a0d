//! # clipfetch-core
//!
//! Discovery and resolution pipeline for sound-effect catalog sites.
//!
//! Given a search term, the pipeline fetches paginated result listings,
//! extracts one stub per clip, resolves every clip's detail page to a direct
//! download link, and returns validated records sorted by label.
//!
//! ## Architecture
//!
//! - **Sources** ([`PageSource`]): the transport boundary. [`HttpPageSource`]
//!   talks to the site; [`FixturePageSource`] serves a fixed catalogue.
//! - **Cache** ([`PageCache`]): raw markup per `(term, page)` for one session
//! - **Extraction** ([`ResultExtractor`]): markup to ordered [`ResultStub`]s
//! - **Resolution** ([`DetailResolver`]): concurrent detail-page lookups
//! - **Aggregation** ([`aggregate()`]): pairing, collation and validation
//! - **Pagination** ([`Paginator`]): the state machine tying it together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clipfetch_core::{Config, HttpPageSource, Paginator};
//!
//! # async fn run() -> clipfetch_core::Result<()> {
//! let config = Config::load()?;
//! let source = HttpPageSource::new(&config)?;
//! let mut paginator = Paginator::with_config(source, &config.site)?;
//!
//! let page = paginator.submit("wilhelm scream").await?;
//! for record in &page.records {
//!     println!("{} -> {}", record.label, record.download);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! A clip whose detail page cannot be resolved degrades to
//! [`DownloadLink::NotFound`] instead of failing its page. Failures that block
//! a whole page surface as [`Error`] and leave the paginator in
//! [`PaginatorState::Failed`], from where it can retry or start over.

/// Result pairing, ordering and validation
pub mod aggregate;
/// Raw markup cache for one session
pub mod cache;
/// Label collation
pub mod collate;
/// Configuration for the site, HTTP client and downloads
pub mod config;
/// Error types and result aliases
pub mod error;
/// Result extraction from search pages
pub mod extract;
/// Pagination state machine
pub mod paginator;
/// Detail-page resolution
pub mod resolve;
/// Menu selection parsing
pub mod selection;
/// Page sources
pub mod source;
/// Core data types
pub mod types;

pub use aggregate::aggregate;
pub use cache::PageCache;
pub use config::{Config, DownloadConfig, HttpConfig, SiteConfig};
pub use error::{Error, Result};
pub use extract::ResultExtractor;
pub use paginator::{Outcome, Paginator, PaginatorState, RetryTarget};
pub use resolve::DetailResolver;
pub use selection::SoundSelection;
pub use source::{
    FIXTURE_PAGE_SIZE, FixtureDetail, FixturePageSource, FixtureSound, HttpPageSource, PageSource,
};
pub use types::{
    DownloadLink, NOT_FOUND_SENTINEL, NavigationAction, PageResult, Query, RawPage, ResultStub,
    SoundRecord,
};
