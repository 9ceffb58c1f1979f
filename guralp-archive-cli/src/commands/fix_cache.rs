//! `guralp-archive fix-cache` — rename misfiled miniseed in the cache.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use guralp_archive_core::{ArchiveConfig, Category, DayPadding, WorkingDate};
use guralp_archive_sync::{repair_miniseed_cache, RelocateOptions};

use super::{print_json, print_moves, working_date};
use crate::GlobalArgs;

/// Arguments for `guralp-archive fix-cache`.
#[derive(Args, Debug)]
pub struct FixCacheArgs {
    /// Guralp cache directory.
    #[arg(short, long)]
    pub cache_dir: Option<PathBuf>,

    /// Date to repair, YYYY-MM-DD (default: yesterday).
    #[arg(short, long)]
    pub date: Option<WorkingDate>,

    /// Day-of-year matching: `padded` (045) or `lenient` (045 or 45).
    #[arg(long, value_name = "MODE")]
    pub day_padding: Option<DayPadding>,

    /// Show what would be renamed without touching any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl FixCacheArgs {
    pub fn run(self, global: &GlobalArgs, config: &ArchiveConfig) -> Result<()> {
        let date = working_date(self.date);
        let cache = self
            .cache_dir
            .unwrap_or_else(|| config.cache_dir_for(Category::Miniseed).to_path_buf());
        let options = RelocateOptions {
            padding: self.day_padding.unwrap_or(config.day_padding),
            dry_run: self.dry_run,
        };

        let moves = repair_miniseed_cache(&cache, &date, options)
            .with_context(|| format!("cache repair failed in {}", cache.display()))?;

        if global.json {
            return print_json(&moves);
        }
        let prefix = if self.dry_run { "[dry-run] " } else { "" };
        if moves.is_empty() {
            println!("{prefix}✓ no misfiled miniseed for {date}");
        } else {
            println!("{prefix}✓ {} miniseed file(s) for {date}", moves.len());
            print_moves(&moves);
        }
        Ok(())
    }
}
