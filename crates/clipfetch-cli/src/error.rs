//! Exit codes for `clipfetch`.
//!
//! Every failure that reaches `main` is sorted into a category, and the
//! category decides the process exit code:
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Clips listed, chosen or downloaded |
//! | 1 | `Internal` | A bug, or a record that failed validation |
//! | 2 | `Usage` | Invalid arguments, query or configuration |
//! | 3 | `NotFound` | Nothing selected, or nothing to act on |
//! | 5 | `Network` | Catalog unreachable or answered with an error status |
//! | 6 | `Timeout` | The HTTP client gave up waiting |
//!
//! ```bash
//! clipfetch search "air horn" --format json > clips.json
//! case $? in
//!     0) echo "ok" ;;
//!     5|6) echo "site unreachable, try again" ;;
//!     *) echo "failed" ;;
//! esac
//! ```

use std::fmt;

use clipfetch_core::Error as CoreError;

/// Kind of failure, one per exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Exit code 1.
    Internal = 1,

    /// Invalid arguments, query or configuration (exit code 2).
    Usage = 2,

    /// Nothing selected or nothing to act on (exit code 3).
    NotFound = 3,

    /// Exit code 5.
    Network = 5,

    /// Exit code 6.
    Timeout = 6,
}

impl ErrorCategory {
    /// Process exit code.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Lowercase label used when displaying the category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::NotFound => "not found",
            Self::Network => "network error",
            Self::Timeout => "timeout",
        }
    }

    /// Category for an error raised by the pipeline.
    #[must_use]
    pub fn from_core(err: &CoreError) -> Self {
        match err {
            CoreError::Network(e) if e.is_timeout() => Self::Timeout,
            CoreError::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => Self::Timeout,
            CoreError::Network(_) | CoreError::Fetch { .. } => Self::Network,
            CoreError::NoSelection | CoreError::MalformedSelection { .. } => Self::NotFound,
            CoreError::InvalidQuery(_) | CoreError::Config(_) | CoreError::InvalidUrl(_) => {
                Self::Usage
            },
            CoreError::Io(_)
            | CoreError::Validation { .. }
            | CoreError::InvalidTransition { .. }
            | CoreError::Parse(_)
            | CoreError::Serialization(_) => Self::Internal,
        }
    }

    /// Guess a category from the rendered message.
    ///
    /// Fallback for errors that reach the top level without a category.
    #[must_use]
    pub fn infer_from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Timeout before Network so "connection timed out" lands here.
        if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            return Self::Timeout;
        }

        if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("dns")
            || msg_lower.contains("http")
            || msg_lower.contains("fetch")
        {
            return Self::Network;
        }

        if msg_lower.contains("not found") || msg_lower.contains("no sounds selected") {
            return Self::NotFound;
        }

        if msg_lower.contains("invalid argument") || msg_lower.contains("configuration") {
            return Self::Usage;
        }

        Self::Internal
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// An error tagged with the category `main` should exit with.
#[derive(Debug)]
pub struct CliError {
    /// Exit category.
    pub category: ErrorCategory,
    /// Wrapped cause, displayed as-is.
    pub source: anyhow::Error,
}

impl CliError {
    /// Tag `source` with `category`.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Bad input or configuration (exit code 2).
    pub fn usage(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Usage, source)
    }

    /// Nothing to act on (exit code 3).
    pub fn not_found(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::NotFound, source)
    }

    /// Exit code of the tagged category.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Exit code for an error that reached `main`.
///
/// An explicit [`CliError`] wins, then a pipeline error anywhere in the
/// chain, then the message heuristic.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }

    if let Some(core) = err.chain().find_map(|cause| cause.downcast_ref::<CoreError>()) {
        return ErrorCategory::from_core(core).exit_code();
    }

    ErrorCategory::infer_from_message(&err.to_string()).exit_code()
}
