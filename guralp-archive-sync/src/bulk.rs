//! Relocation delegated to `rsync --remove-source-files`.
//!
//! Matching still happens in process; `rsync` receives the resolved file list
//! as arguments, one blocking invocation per category. Files whose name is
//! already present in the archive are filtered out beforehand, so the
//! skip-existing policy is the same as in [`crate::relocate`].

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

use guralp_archive_core::{
    paths::{self, archive_dir},
    Category, WorkingDate,
};

use crate::error::SyncError;
use crate::relocate::{find_matches, CacheRoots, RelocateOptions};
use crate::transfer::{Transfer, TransferOutput, TransferRequest};

/// Outcome of one category's bulk transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkRelocation {
    pub category: Category,
    pub target_dir: PathBuf,
    /// Files handed to the transfer (or that would be, in dry-run mode).
    pub files: Vec<PathBuf>,
    /// Matches left in the cache because the archive already has them.
    pub skipped: Vec<PathBuf>,
    /// `None` when no transfer was run.
    pub output: Option<TransferOutput>,
}

/// `-a --remove-source-files <files...> <target_dir>/`
pub fn bulk_request(files: &[PathBuf], target_dir: &Path) -> TransferRequest {
    let mut target = target_dir.as_os_str().to_os_string();
    target.push("/");

    let mut args: Vec<OsString> = vec!["-a".into(), "--remove-source-files".into()];
    args.extend(files.iter().map(|f| f.as_os_str().to_os_string()));
    args.push(target);
    TransferRequest { args }
}

/// Move every cache file of `category` for `date` with a single transfer.
pub fn relocate_category_bulk(
    transfer: &dyn Transfer,
    category: Category,
    cache_root: &Path,
    archive_root: &Path,
    date: &WorkingDate,
    options: RelocateOptions,
) -> Result<BulkRelocation, SyncError> {
    let target_dir = archive_dir(category, archive_root, date);
    let (skipped, files): (Vec<PathBuf>, Vec<PathBuf>) =
        find_matches(category, cache_root, date, options.padding)?
            .into_iter()
            .partition(|f| {
                f.file_name()
                    .is_some_and(|name| target_dir.join(name).exists())
            });

    for f in &skipped {
        tracing::warn!(
            "destination already exists, leaving {} in cache",
            f.display()
        );
    }

    let mut result = BulkRelocation {
        category,
        target_dir,
        files,
        skipped,
        output: None,
    };

    if result.files.is_empty() {
        tracing::info!("{category}: nothing to transfer");
        return Ok(result);
    }

    let request = bulk_request(&result.files, &result.target_dir);
    if options.dry_run {
        tracing::info!("[dry-run] would transfer: {request}");
        return Ok(result);
    }

    paths::ensure_dir(&result.target_dir)?;
    result.output = Some(transfer.run(&request)?);
    tracing::info!(
        "{category}: transferred {} file(s) -> {}",
        result.files.len(),
        result.target_dir.display()
    );
    Ok(result)
}

/// Bulk-relocate all categories in [`Category::RELOCATE_ORDER`], waiting for
/// each transfer before starting the next.
pub fn relocate_all_bulk(
    transfer: &dyn Transfer,
    cache: &CacheRoots,
    archive_root: &Path,
    date: &WorkingDate,
    options: RelocateOptions,
) -> Result<Vec<BulkRelocation>, SyncError> {
    Category::RELOCATE_ORDER
        .into_iter()
        .map(|category| {
            relocate_category_bulk(
                transfer,
                category,
                cache.root_for(category),
                archive_root,
                date,
                options,
            )
        })
        .collect()
}
