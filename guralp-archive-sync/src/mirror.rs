//! Mirror one day of a remote archive into a local one.
//!
//! For every category the remote `<archive>/./<category>/<YYYY/MM/DD>/*` is
//! pulled with `rsync -avR`; the `./` anchor makes rsync recreate only
//! `<category>/<YYYY/MM/DD>/...` under the destination. Nothing is removed on
//! the remote side.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use guralp_archive_core::{Category, WorkingDate};

use crate::error::SyncError;
use crate::transfer::{Transfer, TransferOutput, TransferRequest};

/// Archive root on another host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArchive {
    pub host: String,
    pub user: Option<String>,
    /// Parent directory of the category trees on the remote host.
    pub archive: PathBuf,
}

impl RemoteArchive {
    pub fn new(host: impl Into<String>, archive: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            user: None,
            archive: archive.into(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// `[user@]host:`
    pub fn remote_spec(&self) -> String {
        match &self.user {
            Some(user) => format!("{user}@{}:", self.host),
            None => format!("{}:", self.host),
        }
    }
}

/// `-avR [user@]host:<archive>/./<category>/<YYYY/MM/DD>/* <destination>`
pub fn mirror_request(
    remote: &RemoteArchive,
    category: Category,
    date: &WorkingDate,
    destination: &Path,
) -> TransferRequest {
    let archive = remote.archive.to_string_lossy();
    let source = format!(
        "{}{}/./{}/{}/*",
        remote.remote_spec(),
        archive.trim_end_matches('/'),
        category.dir_name(),
        date.date_path()
    );
    TransferRequest::new([
        OsString::from("-avR"),
        OsString::from(source),
        destination.as_os_str().to_os_string(),
    ])
}

/// Result of mirroring a single category.
#[derive(Debug)]
pub struct MirrorOutcome {
    pub category: Category,
    pub result: Result<TransferOutput, SyncError>,
}

/// Aggregate result of [`mirror_archive`].
#[derive(Debug)]
pub struct MirrorReport {
    pub date: WorkingDate,
    pub destination: PathBuf,
    pub outcomes: Vec<MirrorOutcome>,
}

impl MirrorReport {
    pub fn failures(&self) -> impl Iterator<Item = (Category, &SyncError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.category, e)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Pull `date` for every category in [`Category::MIRROR_ORDER`].
///
/// Fails with [`SyncError::DirectoryNotFound`] before any transfer when
/// `destination` does not exist. A failed category is logged and recorded
/// in the report; the remaining categories still run.
pub fn mirror_archive(
    transfer: &dyn Transfer,
    remote: &RemoteArchive,
    destination: &Path,
    date: &WorkingDate,
) -> Result<MirrorReport, SyncError> {
    if !destination.is_dir() {
        return Err(SyncError::DirectoryNotFound {
            path: destination.to_path_buf(),
        });
    }

    let mut outcomes = Vec::with_capacity(Category::MIRROR_ORDER.len());
    for category in Category::MIRROR_ORDER {
        let request = mirror_request(remote, category, date, destination);
        tracing::info!("syncing {category} for {date} from {}", remote.host);

        let result = transfer.run(&request);
        match &result {
            Ok(_) => tracing::info!("{category}: synced into {}", destination.display()),
            Err(e) => tracing::error!("{category}: sync failed: {e}"),
        }
        outcomes.push(MirrorOutcome { category, result });
    }

    Ok(MirrorReport {
        date: *date,
        destination: destination.to_path_buf(),
        outcomes,
    })
}
