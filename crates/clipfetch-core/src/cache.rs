//! Session-scoped memo of raw results pages.
//!
//! The cache is keyed by `(search term, page)` and owned by one browsing
//! session. It is not an LRU: only one term is active at a time, and the
//! paginator purges a term as soon as it is replaced.

use std::collections::HashMap;

use tracing::debug;

use crate::RawPage;

/// Raw markup cache for one browsing session.
///
/// ```rust
/// use clipfetch_core::{PageCache, RawPage};
///
/// let mut cache = PageCache::new();
/// cache.put("bruh", 1, RawPage::new("<html>1</html>"));
/// assert!(cache.get("bruh", 1).is_some());
///
/// cache.invalidate("bruh");
/// assert!(cache.get("bruh", 1).is_none());
/// ```
#[derive(Debug, Default)]
pub struct PageCache {
    entries: HashMap<(String, u32), RawPage>,
}

impl PageCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached markup for `(search_term, page)`, if any.
    ///
    /// The returned handle shares its buffer with the cached entry.
    pub fn get(&self, search_term: &str, page: u32) -> Option<RawPage> {
        let hit = self.entries.get(&(search_term.to_string(), page)).cloned();
        debug!(
            "Page cache {} for '{}' page {}",
            if hit.is_some() { "hit" } else { "miss" },
            search_term,
            page
        );
        hit
    }

    /// Store markup for `(search_term, page)`, replacing any previous entry.
    pub fn put(&mut self, search_term: &str, page: u32, raw: RawPage) {
        self.entries.insert((search_term.to_string(), page), raw);
    }

    /// Whether `(search_term, page)` is cached.
    pub fn contains(&self, search_term: &str, page: u32) -> bool {
        self.entries.contains_key(&(search_term.to_string(), page))
    }

    /// Remove every entry for `search_term`. Returns how many were removed.
    pub fn invalidate(&mut self, search_term: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(term, _), _| term != search_term);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Purged {} cached page(s) for '{}'", removed, search_term);
        }
        removed
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached pages across all terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
