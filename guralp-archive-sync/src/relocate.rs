//! Per-file relocation from the acquisition cache into the archive.
//!
//! ## `move_file` protocol
//!
//! 1. Skip if the destination name is already taken (never overwrite).
//! 2. Copy the source to `<dest>.partial`.
//! 3. Rename `<dest>.partial` to `<dest>`.
//! 4. Remove the source.
//!
//! A failure in steps 2-3 removes the partial copy and leaves the source in
//! the cache for the next scheduled run. A failure in step 4 removes the
//! archived copy again, so the file never lives in both places. Files moved
//! earlier in the batch stay moved.

use std::path::{Path, PathBuf};

use serde::Serialize;

use guralp_archive_core::{
    paths::{self, archive_dir, cache_dir, cache_pattern},
    Category, DayPadding, WorkingDate,
};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Knobs shared by every relocation entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelocateOptions {
    pub padding: DayPadding,
    /// Report what would move without touching the filesystem.
    pub dry_run: bool,
}

/// Outcome of an individual file move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MoveResult {
    /// File now lives at `to` only.
    Moved { from: PathBuf, to: PathBuf },
    /// `to` already existed; the source was left in place.
    SkippedExisting { from: PathBuf, to: PathBuf },
    /// Dry-run mode: the file *would* have been moved.
    WouldMove { from: PathBuf, to: PathBuf },
}

/// Outcome of relocating one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRelocation {
    pub category: Category,
    pub target_dir: PathBuf,
    pub moves: Vec<MoveResult>,
}

impl CategoryRelocation {
    pub fn moved(&self) -> usize {
        self.count(|m| matches!(m, MoveResult::Moved { .. } | MoveResult::WouldMove { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|m| matches!(m, MoveResult::SkippedExisting { .. }))
    }

    fn count(&self, pred: impl Fn(&MoveResult) -> bool) -> usize {
        self.moves.iter().filter(|&m| pred(m)).count()
    }
}

/// Outcome of relocating every category for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelocationReport {
    pub date: WorkingDate,
    pub categories: Vec<CategoryRelocation>,
}

/// Cache root per category. SOH and miniseed usually share one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRoots {
    pub miniseed: PathBuf,
    pub soh: PathBuf,
    pub latency: PathBuf,
}

impl CacheRoots {
    /// Same root for every category.
    pub fn uniform(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            miniseed: root.clone(),
            soh: root.clone(),
            latency: root,
        }
    }

    pub fn root_for(&self, category: Category) -> &Path {
        match category {
            Category::Miniseed => &self.miniseed,
            Category::Soh => &self.soh,
            Category::Latency => &self.latency,
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Files directly inside `dir` whose names satisfy `select`, sorted by name.
///
/// A missing directory yields no matches.
pub(crate) fn list_files(
    dir: &Path,
    select: impl Fn(&str) -> bool,
) -> Result<Vec<PathBuf>, SyncError> {
    if !dir.is_dir() {
        tracing::debug!("cache directory absent: {}", dir.display());
        return Ok(vec![]);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("skipping unreadable entry in {}: {e}", dir.display());
                None
            }
        })
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|e| e.file_name().to_str().is_some_and(&select))
        .map(|e| e.path())
        .collect();
    files.sort();
    Ok(files)
}

/// Cache files of `category` for `date` under `cache_root`.
pub fn find_matches(
    category: Category,
    cache_root: &Path,
    date: &WorkingDate,
    padding: DayPadding,
) -> Result<Vec<PathBuf>, SyncError> {
    let dir = cache_dir(category, cache_root, date);
    tracing::debug!(
        "searching {} for {}",
        dir.display(),
        cache_pattern(category, date)
    );
    list_files(&dir, |name| paths::matches(category, name, date, padding))
}

// ---------------------------------------------------------------------------
// move_file
// ---------------------------------------------------------------------------

/// Move a single file, copying before deleting.
pub(crate) fn move_file(from: &Path, to: &Path, dry_run: bool) -> Result<MoveResult, SyncError> {
    if to.exists() {
        tracing::warn!(
            "destination already exists, leaving {} in cache: {}",
            from.display(),
            to.display()
        );
        return Ok(MoveResult::SkippedExisting {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would move: {} -> {}", from.display(), to.display());
        return Ok(MoveResult::WouldMove {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
    }

    let partial = partial_path(to);
    if let Err(e) = std::fs::copy(from, &partial) {
        let _ = std::fs::remove_file(&partial);
        return Err(SyncError::Copy {
            from: from.to_path_buf(),
            to: partial,
            source: e,
        });
    }
    if let Err(e) = std::fs::rename(&partial, to) {
        let _ = std::fs::remove_file(&partial);
        return Err(io_err(to, e));
    }
    if let Err(e) = std::fs::remove_file(from) {
        if let Err(undo) = std::fs::remove_file(to) {
            tracing::error!("could not roll back {}: {undo}", to.display());
        }
        return Err(io_err(from, e));
    }

    tracing::debug!("moved: {} -> {}", from.display(), to.display());
    Ok(MoveResult::Moved {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
    })
}

fn partial_path(to: &Path) -> PathBuf {
    let mut name = to.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    to.with_file_name(name)
}

// ---------------------------------------------------------------------------
// relocate_category / relocate_all
// ---------------------------------------------------------------------------

/// Move every cache file of `category` for `date` into
/// `<archive_root>/<category>/YYYY/MM/DD/`.
pub fn relocate_category(
    category: Category,
    cache_root: &Path,
    archive_root: &Path,
    date: &WorkingDate,
    options: RelocateOptions,
) -> Result<CategoryRelocation, SyncError> {
    let files = find_matches(category, cache_root, date, options.padding)?;
    let target_dir = archive_dir(category, archive_root, date);

    if !options.dry_run {
        paths::ensure_dir(&target_dir)?;
    }

    let mut moves = Vec::with_capacity(files.len());
    for from in files {
        let Some(name) = from.file_name() else { continue };
        let to = target_dir.join(name);
        moves.push(move_file(&from, &to, options.dry_run)?);
    }

    let result = CategoryRelocation {
        category,
        target_dir,
        moves,
    };
    tracing::info!(
        "{category}: {} moved, {} skipped -> {}",
        result.moved(),
        result.skipped(),
        result.target_dir.display()
    );
    Ok(result)
}

/// Relocate all categories, in [`Category::RELOCATE_ORDER`].
pub fn relocate_all(
    cache: &CacheRoots,
    archive_root: &Path,
    date: &WorkingDate,
    options: RelocateOptions,
) -> Result<RelocationReport, SyncError> {
    let mut categories = Vec::new();
    for category in Category::RELOCATE_ORDER {
        categories.push(relocate_category(
            category,
            cache.root_for(category),
            archive_root,
            date,
            options,
        )?);
    }
    Ok(RelocationReport {
        date: *date,
        categories,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
