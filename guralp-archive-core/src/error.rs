//! Error types for guralp-archive-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from naming, directory and config operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A working date that is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date '{input}' (expected YYYY-MM-DD): {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown category '{0}'; expected: miniseed, soh, latency")]
    UnknownCategory(String),

    #[error("unknown day padding '{0}'; expected: padded, lenient")]
    UnknownPadding(String),

    /// YAML parse error on load — includes file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
