use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use super::PageSource;
use crate::{Config, Error, Query, RawPage, Result};

/// [`PageSource`] backed by a live catalog site over HTTP.
pub struct HttpPageSource {
    client: Client,
    /// `base_url` with a trailing slash, so joins keep any path prefix.
    site_root: Url,
    base_str: String,
    search_path: String,
}

impl HttpPageSource {
    /// Build a source for the site described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http.timeout())
            .user_agent(config.http.user_agent.as_str())
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Self::with_client(client, &config.site.base_url, &config.site.search_path)
    }

    /// Build a source around an existing client.
    pub fn with_client(client: Client, base_url: &str, search_path: &str) -> Result<Self> {
        let base_str = base_url.trim_end_matches('/').to_string();
        let site_root = Url::parse(&format!("{base_str}/"))?;
        Ok(Self {
            client,
            site_root,
            base_str,
            search_path: search_path.trim_start_matches('/').to_string(),
        })
    }

    /// URL of the results page for `query`.
    ///
    /// The search path is resolved under the base URL, so a base of
    /// `https://host/mirror` searches `https://host/mirror/en/search/`.
    /// Spaces in the term are sent as `%20`.
    ///
    /// ```rust
    /// use clipfetch_core::{Config, HttpPageSource, Query};
    ///
    /// let source = HttpPageSource::new(&Config::default())?;
    /// let url = source.search_url(&Query::with_page("wilhelm scream", 2)?)?;
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://www.myinstants.com/en/search/?name=wilhelm%20scream&page=2"
    /// );
    /// # Ok::<(), clipfetch_core::Error>(())
    /// ```
    pub fn search_url(&self, query: &Query) -> Result<Url> {
        let mut url = self.site_root.join(&self.search_path)?;
        url.query_pairs_mut()
            .append_pair("name", query.search_term())
            .append_pair("page", &query.page().to_string());
        // Form encoding writes spaces as '+' and a literal '+' as %2B.
        let query_string = url.query().map(|q| q.replace('+', "%20"));
        url.set_query(query_string.as_deref());
        Ok(url)
    }

    /// URL of the detail document behind `detail_ref`.
    ///
    /// References are hrefs scraped from results markup and resolve the way
    /// a browser resolves them: a root-relative href starts at the host root,
    /// a relative one under the base URL.
    pub fn detail_url(&self, detail_ref: &str) -> Result<Url> {
        Ok(self.site_root.join(detail_ref)?)
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let content = response.text().await?;
        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, query: &Query) -> Result<RawPage> {
        let url = self.search_url(query)?;
        self.get_text(url).await.map(RawPage::new)
    }

    async fn has_next(&self, query: &Query) -> bool {
        let Ok(url) = self.search_url(&query.next()) else {
            return false;
        };
        match self.client.head(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                debug!("Next-page probe {} answered {}", url, status);
                status.is_success()
            },
            Err(e) => {
                debug!("Next-page probe {} failed, treating as last page: {}", url, e);
                false
            },
        }
    }

    async fn fetch_detail(&self, detail_ref: &str) -> Result<String> {
        let url = self.detail_url(detail_ref)?;
        self.get_text(url).await
    }

    fn base_url(&self) -> &str {
        &self.base_str
    }
}
