pub mod fix_cache;
pub mod mirror;
pub mod relocate;

use anyhow::{Context, Result};
use serde::Serialize;

use guralp_archive_core::WorkingDate;
use guralp_archive_sync::MoveResult;

/// Explicit `--date` or yesterday.
pub(crate) fn working_date(date: Option<WorkingDate>) -> WorkingDate {
    date.unwrap_or_else(WorkingDate::yesterday)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to render JSON report")?
    );
    Ok(())
}

pub(crate) fn print_moves(moves: &[MoveResult]) {
    for m in moves {
        match m {
            MoveResult::Moved { to, .. } => println!("  ✎  {}", to.display()),
            MoveResult::WouldMove { to, .. } => println!("  ~  {}", to.display()),
            MoveResult::SkippedExisting { from, .. } => {
                println!("  !  {} (already archived, left in cache)", from.display())
            }
        }
    }
}
