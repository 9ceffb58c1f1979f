//! Error types for guralp-archive-sync.

use std::path::PathBuf;

use thiserror::Error;

use guralp_archive_core::CoreError;

/// All errors that can arise from relocation and mirroring.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the naming / directory layer.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a cache file into the archive failed.
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external transfer program could not be started at all.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external transfer program ran and exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    TransferFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// A directory that must exist before any transfer is attempted.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
