//! Result extraction from raw search-page markup.
//!
//! Extraction is a pure function of the markup: every element matching the
//! result selector becomes one [`ResultStub`], in document order. A link
//! with no readable text still yields a stub, labelled
//! [`PLACEHOLDER_LABEL`], so one broken element never costs the whole page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::{Error, RawPage, Result, ResultStub};

/// CSS selector for clip links on a results page.
pub const DEFAULT_RESULT_SELECTOR: &str = "div.instant > a.instant-link";

/// Label given to a clip link without readable text.
pub const PLACEHOLDER_LABEL: &str = "Unknown sound";

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static DEFAULT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(DEFAULT_RESULT_SELECTOR).unwrap());

/// Turns results markup into ordered [`ResultStub`]s.
///
/// ```rust
/// use clipfetch_core::{RawPage, ResultExtractor};
///
/// let page = RawPage::new(r#"
///     <div class="instant"><a class="instant-link" href="/en/instant/bruh/">Bruh</a></div>
///     <div class="instant"><a class="instant-link" href="/en/instant/oof/"> Oof </a></div>
/// "#);
/// let stubs = ResultExtractor::default().extract(&page);
/// assert_eq!(stubs.len(), 2);
/// assert_eq!(stubs[1].label, "Oof");
/// assert_eq!(stubs[0].detail_ref.as_deref(), Some("/en/instant/bruh/"));
/// ```
#[derive(Debug, Clone)]
pub struct ResultExtractor {
    selector: Selector,
}

impl Default for ResultExtractor {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.clone(),
        }
    }
}

impl ResultExtractor {
    /// Build an extractor for a custom result selector.
    pub fn new(pattern: &str) -> Result<Self> {
        let selector = Selector::parse(pattern)
            .map_err(|e| Error::Parse(format!("invalid result selector '{pattern}': {e}")))?;
        Ok(Self { selector })
    }

    /// Extract one stub per matching element, in document order.
    pub fn extract(&self, raw: &RawPage) -> Vec<ResultStub> {
        let document = Html::parse_document(raw.markup());
        document
            .select(&self.selector)
            .map(|element| ResultStub {
                label: label_of(&element),
                detail_ref: element
                    .value()
                    .attr("href")
                    .map(str::trim)
                    .filter(|href| !href.is_empty())
                    .map(ToString::to_string),
            })
            .collect()
    }
}

fn label_of(element: &ElementRef<'_>) -> String {
    let text = element.text().collect::<String>();
    let label = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if label.is_empty() {
        PLACEHOLDER_LABEL.to_string()
    } else {
        label
    }
}
