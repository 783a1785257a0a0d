use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::PageSource;
use crate::{Error, Query, RawPage, Result};

/// Number of clips the fixture serves per results page.
pub const FIXTURE_PAGE_SIZE: usize = 6;

const FIXTURE_BASE_URL: &str = "https://www.myinstants.com";

/// What the fixture serves for a clip's detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureDetail {
    /// A page with one download anchor pointing at this href.
    Download(String),
    /// A page whose only anchor lacks the `download` marker.
    NoDownloadAnchor,
    /// The detail request fails.
    Unavailable,
}

/// One clip in the fixture catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSound {
    /// Label rendered as the link text.
    pub label: String,
    /// `href` of the result link; `None` renders a link without one.
    pub detail_ref: Option<String>,
    /// What the detail page contains.
    pub detail: FixtureDetail,
}

impl FixtureSound {
    /// A clip whose detail page links to `/media/sounds/<slug>.mp3`.
    pub fn new(label: &str) -> Self {
        let slug = slugify(label);
        Self {
            label: label.to_string(),
            detail_ref: Some(format!("/en/instant/{slug}/")),
            detail: FixtureDetail::Download(format!("/media/sounds/{slug}.mp3")),
        }
    }

    /// Replace the detail page contents.
    #[must_use]
    pub fn with_detail(mut self, detail: FixtureDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Drop the result link's `href`.
    #[must_use]
    pub fn without_detail_ref(mut self) -> Self {
        self.detail_ref = None;
        self
    }
}

/// Deterministic [`PageSource`] serving a fixed catalogue without network access.
///
/// The search term is ignored: every query sees the same catalogue, split
/// into pages of [`FIXTURE_PAGE_SIZE`]. Calls are counted so tests can assert
/// on transport usage.
///
/// ```rust
/// use clipfetch_core::FixturePageSource;
///
/// let source = FixturePageSource::default();
/// assert_eq!(source.len(), 14);
/// assert_eq!(source.page_fetches(), 0);
/// ```
pub struct FixturePageSource {
    sounds: Vec<FixtureSound>,
    page_size: usize,
    failing_pages: Mutex<HashSet<u32>>,
    page_fetches: AtomicUsize,
    probes: AtomicUsize,
    detail_fetches: AtomicUsize,
}

impl Default for FixturePageSource {
    fn default() -> Self {
        let mut labels = vec!["Wilhelm Scream".to_string(), "THX Deep Note".to_string()];
        labels.extend((1..=12).map(|n| format!("Test Sound {n}")));
        Self::new(labels.iter().map(|label| FixtureSound::new(label)).collect())
    }
}

impl FixturePageSource {
    /// Serve `sounds` in pages of [`FIXTURE_PAGE_SIZE`].
    pub fn new(sounds: Vec<FixtureSound>) -> Self {
        Self::with_page_size(sounds, FIXTURE_PAGE_SIZE)
    }

    /// Serve `sounds` in pages of `page_size` (at least 1).
    pub fn with_page_size(sounds: Vec<FixtureSound>, page_size: usize) -> Self {
        Self {
            sounds,
            page_size: page_size.max(1),
            failing_pages: Mutex::new(HashSet::new()),
            page_fetches: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
            detail_fetches: AtomicUsize::new(0),
        }
    }

    /// A catalogue of `count` generated clips labelled `Clip 1..=count`.
    pub fn generated(count: usize) -> Self {
        Self::new(
            (1..=count)
                .map(|n| FixtureSound::new(&format!("Clip {n}")))
                .collect(),
        )
    }

    /// Number of clips in the catalogue.
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Make fetches of `page` fail (or succeed again) with HTTP 503.
    pub fn set_page_failure(&self, page: u32, failing: bool) {
        let mut pages = self
            .failing_pages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if failing {
            pages.insert(page);
        } else {
            pages.remove(&page);
        }
    }

    /// Results pages fetched so far.
    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }

    /// Next-page probes issued so far.
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Detail pages fetched so far.
    pub fn detail_fetches(&self) -> usize {
        self.detail_fetches.load(Ordering::SeqCst)
    }

    fn page_slice(&self, page: u32) -> &[FixtureSound] {
        let start = (page as usize - 1).saturating_mul(self.page_size);
        if start >= self.sounds.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.sounds.len());
        &self.sounds[start..end]
    }

    fn is_failing(&self, page: u32) -> bool {
        self.failing_pages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(&page)
    }

    fn detail_index(&self) -> HashMap<&str, &FixtureDetail> {
        self.sounds
            .iter()
            .filter_map(|s| s.detail_ref.as_deref().map(|r| (r, &s.detail)))
            .collect()
    }
}

#[async_trait]
impl PageSource for FixturePageSource {
    async fn fetch_page(&self, query: &Query) -> Result<RawPage> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        if self.is_failing(query.page()) {
            return Err(Error::Fetch {
                url: format!(
                    "{FIXTURE_BASE_URL}/en/search/?name={}&page={}",
                    query.search_term(),
                    query.page()
                ),
                status: 503,
            });
        }
        Ok(RawPage::new(search_page_markup(self.page_slice(query.page()))))
    }

    async fn has_next(&self, query: &Query) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let start = (query.page() as usize - 1).saturating_mul(self.page_size);
        start + self.page_size < self.sounds.len()
    }

    async fn fetch_detail(&self, detail_ref: &str) -> Result<String> {
        self.detail_fetches.fetch_add(1, Ordering::SeqCst);
        match self.detail_index().get(detail_ref) {
            Some(FixtureDetail::Download(href)) => Ok(detail_page_markup(Some(href.as_str()))),
            Some(FixtureDetail::NoDownloadAnchor) => Ok(detail_page_markup(None)),
            Some(FixtureDetail::Unavailable) | None => Err(Error::Fetch {
                url: format!("{FIXTURE_BASE_URL}{detail_ref}"),
                status: 404,
            }),
        }
    }

    fn base_url(&self) -> &str {
        FIXTURE_BASE_URL
    }
}

fn search_page_markup(sounds: &[FixtureSound]) -> String {
    let mut items = String::new();
    for sound in sounds {
        let label = html_escape::encode_text(&sound.label);
        match &sound.detail_ref {
            Some(href) => {
                let href = html_escape::encode_double_quoted_attribute(href);
                items.push_str(&format!(
                    "      <div class=\"instant\">\n        <a href=\"{href}\" class=\"instant-link\">{label}</a>\n      </div>\n"
                ));
            },
            None => items.push_str(&format!(
                "      <div class=\"instant\">\n        <a class=\"instant-link\">{label}</a>\n      </div>\n"
            )),
        }
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Search Results</title></head>\n<body>\n  <div class=\"instant-list\">\n{items}  </div>\n</body>\n</html>\n"
    )
}

fn detail_page_markup(download_href: Option<&str>) -> String {
    let anchor = match download_href {
        Some(href) => format!(
            "<a href=\"{}\" download=\"sound.mp3\">Download MP3</a>",
            html_escape::encode_double_quoted_attribute(href)
        ),
        None => "<a href=\"/en/favorites/\">Add to favorites</a>".to_string(),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Sound Detail</title></head>\n<body>\n  <a href=\"/en/index/\">Home</a>\n  {anchor}\n</body>\n</html>\n"
    )
}

fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for ch in label.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Wilhelm Scream"), "wilhelm-scream");
        assert_eq!(slugify("Test Sound 10"), "test-sound-10");
        assert_eq!(slugify("  Bruh!!  "), "bruh");
    }

    #[tokio::test]
    async fn test_pages_follow_page_size() {
        let source = FixturePageSource::default();
        let third = source.fetch_page(&Query::with_page("x", 3).unwrap()).await.unwrap();
        assert_eq!(third.markup().matches("instant-link").count(), 2);

        let beyond = source.fetch_page(&Query::with_page("x", 4).unwrap()).await.unwrap();
        assert_eq!(beyond.markup().matches("instant-link").count(), 0);
        assert_eq!(source.page_fetches(), 2);
    }

    #[tokio::test]
    async fn test_has_next_matches_catalogue_size() {
        let source = FixturePageSource::default();
        assert!(source.has_next(&Query::with_page("x", 2).unwrap()).await);
        assert!(!source.has_next(&Query::with_page("x", 3).unwrap()).await);
        assert_eq!(source.probes(), 2);
    }

    #[tokio::test]
    async fn test_failing_page_can_be_healed() {
        let source = FixturePageSource::default();
        source.set_page_failure(1, true);
        let query = Query::new("x").unwrap();
        assert!(matches!(
            source.fetch_page(&query).await,
            Err(Error::Fetch { status: 503, .. })
        ));
        source.set_page_failure(1, false);
        assert!(source.fetch_page(&query).await.is_ok());
    }

    #[tokio::test]
    async fn test_detail_variants() {
        let source = FixturePageSource::new(vec![
            FixtureSound::new("A"),
            FixtureSound::new("B").with_detail(FixtureDetail::NoDownloadAnchor),
            FixtureSound::new("C").with_detail(FixtureDetail::Unavailable),
        ]);
        let a = source.fetch_detail("/en/instant/a/").await.unwrap();
        assert!(a.contains("/media/sounds/a.mp3"));
        let b = source.fetch_detail("/en/instant/b/").await.unwrap();
        assert!(!b.contains("download="));
        assert!(source.fetch_detail("/en/instant/c/").await.is_err());
        assert!(source.fetch_detail("/en/instant/unknown/").await.is_err());
        assert_eq!(source.detail_fetches(), 4);
    }

    #[test]
    fn test_labels_are_escaped() {
        let markup = search_page_markup(&[FixtureSound::new("Tom & Jerry <3")]);
        assert!(markup.contains("Tom &amp; Jerry &lt;3"));
    }
}
