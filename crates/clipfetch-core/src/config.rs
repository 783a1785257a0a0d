//! Configuration for the catalog site, HTTP client and download sink.
//!
//! Configuration lives in a single TOML file. Lookup order:
//!
//! 1. `CLIPFETCH_CONFIG` - explicit path to a config file
//! 2. `CLIPFETCH_CONFIG_DIR` - directory containing `config.toml`
//! 3. Platform config directory (`~/.config/clipfetch/config.toml` on Linux)
//!
//! A missing file yields [`Config::default`]. `CLIPFETCH_BASE_URL` overrides
//! `site.base_url` after loading.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [site]
//! base_url = "https://www.myinstants.com"
//! search_path = "/en/search/"
//! result_selector = "div.instant > a.instant-link"
//! audio_extension = "mp3"
//!
//! [http]
//! request_timeout_secs = 30
//!
//! [download]
//! output_dir = "/home/user/Music/sfx"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const CONFIG_FILE: &str = "config.toml";

/// Catalog searched when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://www.myinstants.com";

/// File extension download anchors must carry by default.
pub const DEFAULT_AUDIO_EXTENSION: &str = "mp3";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where and how to scrape.
    pub site: SiteConfig,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Download sink settings.
    pub download: DownloadConfig,
}

/// Catalog site layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the catalog, without a trailing slash.
    pub base_url: String,
    /// Path of the search endpoint; `name` and `page` are appended as query parameters.
    pub search_path: String,
    /// CSS selector matching one clip link on a results page.
    pub result_selector: String,
    /// File extension a download anchor must end with.
    pub audio_extension: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            search_path: "/en/search/".to_string(),
            result_selector: crate::extract::DEFAULT_RESULT_SELECTOR.to_string(),
            audio_extension: DEFAULT_AUDIO_EXTENSION.to_string(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: concat!("clipfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// The request timeout as a [`Duration`].
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Download sink settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Directory downloads are written to; the working directory when unset.
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {e}")))?;
        Ok(())
    }

    /// Resolve the config file path from the environment or platform directories.
    pub fn config_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os("CLIPFETCH_CONFIG") {
            return Some(PathBuf::from(explicit));
        }
        if let Some(dir) = std::env::var_os("CLIPFETCH_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join(CONFIG_FILE));
        }
        directories::ProjectDirs::from("dev", "clipfetch", "clipfetch")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("CLIPFETCH_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.site.base_url = base_url;
            }
        }
    }

    /// Check that the site settings can produce usable URLs.
    pub fn validate(&mut self) -> Result<()> {
        let trimmed = self.site.base_url.trim().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&trimmed)
            .map_err(|e| Error::Config(format!("site.base_url '{trimmed}' is not a URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "site.base_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        self.site.base_url = trimmed;
        if self.site.audio_extension.trim().is_empty() {
            return Err(Error::Config("site.audio_extension must not be empty".into()));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(Error::Config("http.request_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
