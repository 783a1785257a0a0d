//! Core data types flowing through the discovery pipeline.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Placeholder text shown for a clip whose download link could not be resolved.
pub const NOT_FOUND_SENTINEL: &str = "not-found";

/// One page of a search: a non-empty search term and a 1-based page number.
///
/// Two queries with the same term and page address the same cache entry.
///
/// ```rust
/// use clipfetch_core::Query;
///
/// let q = Query::new("wilhelm scream")?;
/// assert_eq!(q.page(), 1);
/// assert_eq!(q.next().page(), 2);
/// assert!(Query::new("   ").is_err());
/// # Ok::<(), clipfetch_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    search_term: String,
    page: u32,
}

impl Query {
    /// Build a query for the first page of `search_term`.
    pub fn new(search_term: impl Into<String>) -> Result<Self> {
        Self::with_page(search_term, 1)
    }

    /// Build a query for an explicit page. The term is trimmed.
    pub fn with_page(search_term: impl Into<String>, page: u32) -> Result<Self> {
        let term = search_term.into();
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidQuery("search term must not be empty".into()));
        }
        if page == 0 {
            return Err(Error::InvalidQuery("pages are numbered from 1".into()));
        }
        Ok(Self {
            search_term: trimmed.to_string(),
            page,
        })
    }

    /// The search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// The 1-based page number.
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The same term, one page further.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            search_term: self.search_term.clone(),
            page: self.page.saturating_add(1),
        }
    }

    /// The same term, one page back. Returns `None` on page 1.
    #[must_use]
    pub fn prev(&self) -> Option<Self> {
        (self.page > 1).then(|| Self {
            search_term: self.search_term.clone(),
            page: self.page - 1,
        })
    }
}

/// Raw search-result markup for one page.
///
/// Cloning is cheap and clones share the same buffer, so a page handed out
/// twice by the cache is the identical value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage(Arc<str>);

impl RawPage {
    /// Wrap fetched markup.
    pub fn new(markup: impl Into<Arc<str>>) -> Self {
        Self(markup.into())
    }

    /// Borrow the markup.
    pub fn markup(&self) -> &str {
        &self.0
    }

    /// Whether two handles point at the same buffer.
    pub fn same_buffer(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A clip link found on a results page, before its detail page is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStub {
    /// Display label of the clip.
    pub label: String,
    /// Relative locator of the clip's detail page, if the link had one.
    pub detail_ref: Option<String>,
}

/// Outcome of resolving a clip's detail page.
///
/// Serializes as the bare URL, or as `"not-found"` when unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DownloadLink {
    /// Fully-qualified download URL.
    Resolved(String),
    /// The detail page could not be fetched or had no download anchor.
    NotFound,
}

impl DownloadLink {
    /// The URL, or the `not-found` placeholder.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Resolved(url) => url,
            Self::NotFound => NOT_FOUND_SENTINEL,
        }
    }

    /// The URL if resolution succeeded.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Resolved(url) => Some(url),
            Self::NotFound => None,
        }
    }

    /// Whether resolution succeeded.
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl fmt::Display for DownloadLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DownloadLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DownloadLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() || raw == NOT_FOUND_SENTINEL {
            Ok(Self::NotFound)
        } else {
            Ok(Self::Resolved(raw))
        }
    }
}

/// A validated search result: a label and where to download it from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundRecord {
    /// Display label of the clip.
    pub label: String,
    /// Where the clip can be downloaded from.
    #[serde(rename = "download_url")]
    pub download: DownloadLink,
}

impl SoundRecord {
    /// Pair a label with its resolved link.
    pub fn new(label: impl Into<String>, download: DownloadLink) -> Self {
        Self {
            label: label.into(),
            download,
        }
    }
}

impl fmt::Display for SoundRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// One page of validated results plus the navigation it allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Sorted records for this page.
    pub records: Vec<SoundRecord>,
    /// Whether the probe found a following page.
    pub has_next_page: bool,
    /// Whether a preceding page exists (`current_page > 1`).
    pub has_previous_page: bool,
    /// The 1-based page these records came from.
    pub current_page: u32,
}

impl PageResult {
    /// Build a page result; `has_previous_page` is derived from `current_page`.
    pub const fn new(records: Vec<SoundRecord>, current_page: u32, has_next_page: bool) -> Self {
        Self {
            records,
            has_next_page,
            has_previous_page: current_page > 1,
            current_page,
        }
    }
}

/// Navigation intent supplied by the interactive front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationAction {
    /// Load the preceding page.
    PrevPage,
    /// Load the following page.
    NextPage,
    /// Abandon the current term and start over.
    NewSearch,
    /// Fetch and resolve every page of the current term.
    ShowAll,
}

impl NavigationAction {
    /// All actions in menu order.
    pub const ALL: [Self; 4] = [Self::PrevPage, Self::NextPage, Self::NewSearch, Self::ShowAll];

    /// Stable identifier, matching the `action:*` values used in menus.
    pub const fn id(self) -> &'static str {
        match self {
            Self::PrevPage => "action:prev-page",
            Self::NextPage => "action:next-page",
            Self::NewSearch => "action:new-search",
            Self::ShowAll => "action:show-all",
        }
    }

    /// Parse an `action:*` identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }

    /// Whether this action can be taken on `page`.
    pub const fn is_enabled(self, page: &PageResult) -> bool {
        match self {
            Self::PrevPage => page.has_previous_page,
            Self::NextPage => page.has_next_page,
            Self::NewSearch | Self::ShowAll => true,
        }
    }
}
