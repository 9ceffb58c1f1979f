//! External transfer program seam.
//!
//! Requests are argument lists handed straight to the program; no shell is
//! involved, so paths with spaces or glob characters are passed verbatim.
//! Every call blocks until the program exits.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::error::SyncError;

/// Arguments for one transfer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub args: Vec<OsString>,
}

impl TransferRequest {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<_> = self.args.iter().map(|a| a.to_string_lossy()).collect();
        f.write_str(&rendered.join(" "))
    }
}

/// Captured output of a successful transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Something that can carry out a [`TransferRequest`].
pub trait Transfer {
    fn run(&self, request: &TransferRequest) -> Result<TransferOutput, SyncError>;
}

/// Runs requests through the `rsync` binary.
#[derive(Debug, Clone)]
pub struct Rsync {
    program: PathBuf,
}

impl Default for Rsync {
    fn default() -> Self {
        Self::new()
    }
}

impl Rsync {
    pub fn new() -> Self {
        Self::with_program(guralp_archive_core::config::DEFAULT_RSYNC)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Transfer for Rsync {
    fn run(&self, request: &TransferRequest) -> Result<TransferOutput, SyncError> {
        let program = self.program.display().to_string();
        tracing::debug!("running: {program} {request}");

        let output = Command::new(&self.program)
            .args(&request.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| SyncError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !stdout.is_empty() {
            tracing::debug!("{program} stdout: {stdout}");
        }

        if !output.status.success() {
            return Err(SyncError::TransferFailed {
                command: format!("{program} {request}"),
                status: output.status.to_string(),
                stderr,
            });
        }

        if !stderr.is_empty() {
            tracing::warn!("{program} stderr: {stderr}");
        }

        Ok(TransferOutput { stdout, stderr })
    }
}
