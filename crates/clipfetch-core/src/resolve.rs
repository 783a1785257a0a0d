//! Detail-page resolution: from a clip's detail reference to its download link.
//!
//! A batch of resolutions is a scatter/gather: every reference is dispatched
//! at once, each result is tagged with the index of the stub it came from,
//! and the batch completes only when every resolution has settled. Arrival
//! order is irrelevant; the output is addressed by stub index.
//!
//! Failures never escape a resolution. A missing reference, a failed fetch
//! or a detail page without a download anchor all settle as
//! [`DownloadLink::NotFound`].

use std::sync::{Arc, LazyLock};

use futures::stream::{FuturesUnordered, StreamExt};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::{DownloadLink, PageSource, ResultStub};

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static DOWNLOAD_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href][download]").unwrap());

/// Resolves detail references to download links through a [`PageSource`].
#[derive(Clone)]
pub struct DetailResolver {
    source: Arc<dyn PageSource>,
    extension: String,
}

impl DetailResolver {
    /// Resolve through `source`, accepting anchors that end in `.{audio_extension}`.
    pub fn new(source: Arc<dyn PageSource>, audio_extension: &str) -> Self {
        let extension = format!(
            ".{}",
            audio_extension.trim().trim_start_matches('.').to_ascii_lowercase()
        );
        Self { source, extension }
    }

    /// Resolve one detail reference.
    ///
    /// An absent or blank reference settles immediately without touching the
    /// transport.
    pub async fn resolve(&self, detail_ref: Option<&str>) -> DownloadLink {
        let Some(detail_ref) = detail_ref.map(str::trim).filter(|r| !r.is_empty()) else {
            return DownloadLink::NotFound;
        };

        let document = match self.source.fetch_detail(detail_ref).await {
            Ok(document) => document,
            Err(e) => {
                warn!("Could not fetch detail page {}: {}", detail_ref, e);
                return DownloadLink::NotFound;
            },
        };

        match self.find_download_link(&document) {
            Some(url) => DownloadLink::Resolved(url),
            None => {
                warn!("No download link on detail page {}", detail_ref);
                DownloadLink::NotFound
            },
        }
    }

    /// Resolve every stub concurrently; `result[i]` belongs to `stubs[i]`.
    pub async fn resolve_all(&self, stubs: &[ResultStub]) -> Vec<DownloadLink> {
        let mut pending: FuturesUnordered<_> = stubs
            .iter()
            .enumerate()
            .map(|(index, stub)| async move {
                (index, self.resolve(stub.detail_ref.as_deref()).await)
            })
            .collect();

        let mut slots = vec![DownloadLink::NotFound; stubs.len()];
        while let Some((index, link)) = pending.next().await {
            slots[index] = link;
        }

        let resolved = slots.iter().filter(|link| link.is_resolved()).count();
        debug!("Resolved {}/{} download links", resolved, stubs.len());
        slots
    }

    /// First download anchor in document order whose target ends in the audio
    /// extension, made absolute against the source's base URL.
    fn find_download_link(&self, document: &str) -> Option<String> {
        let html = Html::parse_document(document);
        let href = html
            .select(&DOWNLOAD_ANCHOR)
            .filter_map(|anchor| anchor.value().attr("href"))
            .map(str::trim)
            .find(|href| self.has_audio_extension(href))?
            .to_string();
        absolutize(self.source.base_url(), &href)
    }

    fn has_audio_extension(&self, href: &str) -> bool {
        let path = href.split(['?', '#']).next().unwrap_or(href);
        path.to_ascii_lowercase().ends_with(&self.extension)
    }
}

fn absolutize(base_url: &str, href: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    base.join(href).ok().map(String::from)
}
