//! # guralp-archive-sync
//!
//! Moves station files from the acquisition cache into the dated archive and
//! mirrors archive partitions between hosts.
//!
//! - [`relocate_all`] — per-file copy-then-delete from cache to archive
//! - [`relocate_all_bulk`] — the same move delegated to one `rsync` call per category
//! - [`repair_miniseed_cache`] — rename misfiled miniseed files into the cache layout
//! - [`mirror_archive`] — pull one day of every category from a remote archive

pub mod bulk;
pub mod error;
pub mod mirror;
pub mod relocate;
pub mod repair;
pub mod transfer;

pub use bulk::{relocate_all_bulk, relocate_category_bulk, BulkRelocation};
pub use error::SyncError;
pub use mirror::{mirror_archive, MirrorOutcome, MirrorReport, RemoteArchive};
pub use relocate::{
    relocate_all, relocate_category, CacheRoots, CategoryRelocation, MoveResult,
    RelocateOptions, RelocationReport,
};
pub use repair::repair_miniseed_cache;
pub use transfer::{Rsync, Transfer, TransferOutput, TransferRequest};
