//! `guralp-archive relocate` — move one day of cache files into the archive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use guralp_archive_core::{ArchiveConfig, Category, DayPadding, WorkingDate};
use guralp_archive_sync::{
    relocate_all, relocate_all_bulk, BulkRelocation, CacheRoots, RelocateOptions,
    RelocationReport, Rsync,
};

use super::{print_json, print_moves, working_date};
use crate::GlobalArgs;

/// Arguments for `guralp-archive relocate`.
#[derive(Args, Debug)]
pub struct RelocateArgs {
    /// Guralp cache directory.
    #[arg(short, long)]
    pub cache_dir: Option<PathBuf>,

    /// Cache directory for miniseed files only.
    #[arg(long)]
    pub miniseed_cache_dir: Option<PathBuf>,

    /// Cache directory for SOH files only.
    #[arg(long)]
    pub soh_cache_dir: Option<PathBuf>,

    /// Cache directory for latency files only.
    #[arg(long)]
    pub latency_cache_dir: Option<PathBuf>,

    /// Archive directory.
    #[arg(short, long)]
    pub archive_dir: Option<PathBuf>,

    /// Date to archive, YYYY-MM-DD (default: yesterday).
    #[arg(short, long)]
    pub date: Option<WorkingDate>,

    /// Day-of-year matching: `padded` (045) or `lenient` (045 or 45).
    #[arg(long, value_name = "MODE")]
    pub day_padding: Option<DayPadding>,

    /// Hand each category to rsync --remove-source-files instead of
    /// copying file by file.
    #[arg(long)]
    pub bulk: bool,

    /// Show what would be moved without touching any files.
    #[arg(long)]
    pub dry_run: bool,
}

impl RelocateArgs {
    pub fn run(self, global: &GlobalArgs, config: &ArchiveConfig) -> Result<()> {
        let date = working_date(self.date);
        let archive = self
            .archive_dir
            .clone()
            .unwrap_or_else(|| config.archive_dir.clone());
        let cache = self.cache_roots(config);
        let options = RelocateOptions {
            padding: self.day_padding.unwrap_or(config.day_padding),
            dry_run: self.dry_run,
        };

        tracing::info!("archiving {date} into {}", archive.display());

        if self.bulk {
            let rsync = Rsync::with_program(&config.rsync_program);
            let results = relocate_all_bulk(&rsync, &cache, &archive, &date, options)
                .with_context(|| format!("bulk relocation failed for {date}"))?;
            if global.json {
                return print_json(&results);
            }
            print_bulk(&date, &results, self.dry_run);
        } else {
            let report = relocate_all(&cache, &archive, &date, options)
                .with_context(|| format!("relocation failed for {date}"))?;
            if global.json {
                return print_json(&report);
            }
            print_report(&report, self.dry_run);
        }
        Ok(())
    }

    /// Per-category flag, then `--cache-dir`, then the config file.
    fn cache_roots(&self, config: &ArchiveConfig) -> CacheRoots {
        let pick = |category: Category, specific: &Option<PathBuf>| {
            specific
                .clone()
                .or_else(|| self.cache_dir.clone())
                .unwrap_or_else(|| config.cache_dir_for(category).to_path_buf())
        };
        CacheRoots {
            miniseed: pick(Category::Miniseed, &self.miniseed_cache_dir),
            soh: pick(Category::Soh, &self.soh_cache_dir),
            latency: pick(Category::Latency, &self.latency_cache_dir),
        }
    }
}

fn print_report(report: &RelocationReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    for c in &report.categories {
        let mark = if c.skipped() > 0 { "!".yellow() } else { "✓".green() };
        if c.moves.is_empty() {
            println!("{prefix}{mark} {} {} — nothing to do", c.category, report.date);
            continue;
        }
        println!(
            "{prefix}{mark} {} {} ({} moved, {} skipped)",
            c.category,
            report.date,
            c.moved(),
            c.skipped()
        );
        print_moves(&c.moves);
    }
}

fn print_bulk(date: &WorkingDate, results: &[BulkRelocation], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    for r in results {
        let mark = if r.skipped.is_empty() { "✓".green() } else { "!".yellow() };
        println!(
            "{prefix}{mark} {} {date} ({} transferred, {} skipped) -> {}",
            r.category,
            r.files.len(),
            r.skipped.len(),
            r.target_dir.display()
        );
    }
}
