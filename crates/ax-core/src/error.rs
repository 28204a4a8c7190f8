//! Error types for ax-core operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Variants are
//! grouped by the stage that failed (fetching, parsing, indexing, cache
//! bookkeeping) so callers can decide whether to fall back to a cached index
//! or surface the failure.
//!
//! ```rust
//! use ax_core::Error;
//!
//! let err = Error::Fetch { url: "https://example.com/llms.txt".into(), status: 503 };
//! assert_eq!(err.category(), "fetch");
//! assert!(err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for ax-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure (DNS, connect, timeout, body decode).
    ///
    /// The wrapped `reqwest::Error` carries the request URL in its message.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a status the caller cannot use.
    #[error("Failed to fetch {url}: HTTP {status}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// Markdown could not be parsed into a syntax tree.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Search index creation, open, write, or query failed.
    #[error("Index error: {0}")]
    Index(String),

    /// Cache directory or metadata bookkeeping failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration file is unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON or TOML conversion failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Anything that does not fit the categories above.
    #[error("{0}")]
    Other(String),
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

impl From<tantivy::TantivyError> for Error {
    fn from(err: tantivy::TantivyError) -> Self {
        Self::Index(err.to_string())
    }
}

impl Error {
    /// Whether retrying the same operation later might succeed.
    ///
    /// Timeouts, refused connections and 5xx/429 responses are treated as
    /// transient. Everything else is permanent.
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

    /// Short identifier for logging and exit-code mapping.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Fetch { .. } => "fetch",
            Self::Parse(_) => "parse",
            Self::Index(_) => "index",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
