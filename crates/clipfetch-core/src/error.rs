//! Error types and handling for clipfetch-core operations.
//!
//! Errors fall into a few families:
//!
//! - **Fetch errors**: transport failures ([`Error::Network`]) and non-success
//!   HTTP statuses ([`Error::Fetch`]). Inside a resolution batch these are
//!   absorbed into [`DownloadLink::NotFound`](crate::DownloadLink::NotFound);
//!   when they block a whole page they surface to the caller.
//! - **Validation errors**: a produced record broke a shape invariant. These
//!   signal a pipeline defect and are never expected at runtime.
//! - **Selection errors**: a caller-supplied selection cannot be mapped back to
//!   a record.
//! - **State errors**: a pagination transition that the current state forbids.
//!
//! ```rust
//! use clipfetch_core::Error;
//!
//! let err = Error::InvalidQuery("search term must not be empty".into());
//! assert_eq!(err.category(), "invalid_query");
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for clipfetch-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure talking to the catalog site.
    ///
    /// Connection and timeout errors are recoverable through retry.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The catalog site answered with a non-success status.
    #[error("Failed to fetch '{url}': HTTP {status}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// A produced record failed its shape invariants.
    #[error("Validation error at record {index}: {reason}")]
    Validation {
        /// Position of the offending record in the aggregated sequence.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The caller selected nothing.
    #[error("No sounds selected. Please select at least one sound.")]
    NoSelection,

    /// A selection could not be mapped to a known record.
    #[error("Invalid selection at index {index}: {reason}")]
    MalformedSelection {
        /// Position of the offending selection.
        index: usize,
        /// Why it could not be mapped.
        reason: String,
    },

    /// The query cannot be issued (blank term, page 0).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The paginator was asked for a transition its current state does not allow.
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        /// Name of the state the paginator was in.
        state: &'static str,
        /// Name of the rejected action.
        action: &'static str,
    },

    /// A URL could not be built or joined.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Markup or selector parsing failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Check if the error might go away if the operation is retried.
    ///
    /// Used by the CLI to decide whether to offer "retry" after a failed page
    /// load. Server errors (5xx) and rate limiting (429) count as recoverable;
    /// other HTTP statuses do not.
    ///
    /// ```rust
    /// use clipfetch_core::Error;
    ///
    /// let busy = Error::Fetch { url: "https://example.com".into(), status: 503 };
    /// assert!(busy.is_recoverable());
    ///
    /// let gone = Error::Fetch { url: "https://example.com".into(), status: 404 };
    /// assert!(!gone.is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Fetch { status, .. } => *status >= 500 || *status == 429,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) | Self::Fetch { .. } => "fetch",
            Self::Validation { .. } => "validation",
            Self::NoSelection | Self::MalformedSelection { .. } => "selection",
            Self::InvalidQuery(_) => "invalid_query",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
