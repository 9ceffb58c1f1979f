//! Repair of misfiled miniseed files in the cache.
//!
//! Some data centres write `NN_STA_LOC_CHA_YYYY_JJJ.mseed` straight into
//! `<cache_root>/miniseed/` instead of `<cache_root>/miniseed/YYYY/` with
//! the dotted name. [`repair_miniseed_cache`] moves those into place so a
//! normal relocation picks them up.

use std::path::Path;

use guralp_archive_core::{
    paths::{self, cache_dir, is_channel_id, strip_date_suffix},
    Category, DayPadding, WorkingDate,
};

use crate::error::SyncError;
use crate::relocate::{list_files, move_file, MoveResult, RelocateOptions};

/// Dotted cache name for a misfiled miniseed file, or `None` if `file_name`
/// is not one for `date`.
///
/// The day token is always rewritten in its padded form, so files accepted
/// in lenient mode come out matching the padded cache pattern.
pub fn repaired_name(file_name: &str, date: &WorkingDate, padding: DayPadding) -> Option<String> {
    let stem = file_name.strip_suffix(".mseed")?;
    let head = strip_date_suffix(stem, '_', date, padding)?;
    if !is_channel_id(head, '_') {
        return None;
    }
    Some(format!(
        "{}.{}.{}",
        head.replace('_', "."),
        date.year_token(),
        date.julian()
    ))
}

/// Move misfiled miniseed files for `date` into the cache layout.
pub fn repair_miniseed_cache(
    cache_root: &Path,
    date: &WorkingDate,
    options: RelocateOptions,
) -> Result<Vec<MoveResult>, SyncError> {
    let source_dir = cache_root.join(Category::Miniseed.dir_name());
    let target_dir = cache_dir(Category::Miniseed, cache_root, date);

    let files = list_files(&source_dir, |name| {
        repaired_name(name, date, options.padding).is_some()
    })?;
    if files.is_empty() {
        tracing::info!("no misfiled miniseed in {}", source_dir.display());
        return Ok(vec![]);
    }

    if !options.dry_run {
        paths::ensure_dir(&target_dir)?;
    }

    let mut moves = Vec::with_capacity(files.len());
    for from in files {
        let Some(name) = from
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| repaired_name(n, date, options.padding))
        else {
            continue;
        };
        moves.push(move_file(&from, &target_dir.join(name), options.dry_run)?);
    }
    tracing::info!("repaired {} miniseed file(s) into {}", moves.len(), target_dir.display());
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feb14() -> WorkingDate {
        WorkingDate::parse("2024-02-14").unwrap()
    }

    #[test]
    fn underscore_name_becomes_dotted() {
        assert_eq!(
            repaired_name("NN_STA01_00_HHZ_2024_045.mseed", &feb14(), DayPadding::Padded).as_deref(),
            Some("NN.STA01.00.HHZ.2024.045")
        );
    }

    #[test]
    fn lenient_match_is_rewritten_padded() {
        assert_eq!(
            repaired_name("NN_STA01_00_HHZ_2024_45.mseed", &feb14(), DayPadding::Lenient).as_deref(),
            Some("NN.STA01.00.HHZ.2024.045")
        );
        assert_eq!(
            repaired_name("NN_STA01_00_HHZ_2024_45.mseed", &feb14(), DayPadding::Padded),
            None
        );
    }

    #[test]
    fn other_days_and_extensions_are_ignored() {
        let d = feb14();
        assert_eq!(repaired_name("NN_STA01_00_HHZ_2024_046.mseed", &d, DayPadding::Padded), None);
        assert_eq!(repaired_name("NN_STA01_00_HHZ_2024_045.csv", &d, DayPadding::Padded), None);
        assert_eq!(repaired_name("STA01_HHZ_2024_045.mseed", &d, DayPadding::Padded), None);
    }
}
