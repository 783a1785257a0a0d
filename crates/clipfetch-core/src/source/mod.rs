//! Page sources: where raw search-result and detail markup comes from.
//!
//! The pipeline only talks to the catalog through [`PageSource`], so the
//! network boundary can be swapped for [`FixturePageSource`] in tests and in
//! the CLI's `--mock` mode.

mod fixture;
mod http;

pub use fixture::{FixtureDetail, FixturePageSource, FixtureSound, FIXTURE_PAGE_SIZE};
pub use http::HttpPageSource;

use async_trait::async_trait;

use crate::{Query, RawPage, Result};

/// Transport capability for one catalog site.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the results markup for `query`.
    ///
    /// Fails with [`Error::Fetch`](crate::Error::Fetch) on a non-success status
    /// and [`Error::Network`](crate::Error::Network) when the request itself fails.
    async fn fetch_page(&self, query: &Query) -> Result<RawPage>;

    /// Probe whether the page after `query` exists.
    ///
    /// Any transport failure answers `false`; a failed probe is never read as
    /// "more data exists".
    async fn has_next(&self, query: &Query) -> bool;

    /// Fetch the detail document behind a clip's relative reference.
    async fn fetch_detail(&self, detail_ref: &str) -> Result<String>;

    /// Scheme and host that relative links on this site resolve against.
    fn base_url(&self) -> &str;
}
