//! Cache and archive naming convention.
//!
//! # Layout
//!
//! ```text
//! <cache_root>/miniseed/<YYYY>/<NN>.<STA>.<LOC>.<CHA>.<YYYY>.<JJJ>
//! <cache_root>/miniseed/<YYYY>/<STA>.SOH.<YYYY>.<JJJ>
//! <cache_root>/latency/<a>_<b>_<c>_<d>_<YYYY>_<JJJ>.csv
//!
//! <archive_root>/<category>/<YYYY>/<MM>/<DD>/<original filename>
//! ```
//!
//! Everything here is pure except [`ensure_dir`]. Matching happens in
//! process against single file names; nothing is handed to a shell.

use std::path::{Path, PathBuf};

use crate::error::{io_err, CoreError};
use crate::types::{Category, DayPadding, WorkingDate};

/// Permission mode applied to every archive directory created.
pub const ARCHIVE_DIR_MODE: u32 = 0o755;

// ---------------------------------------------------------------------------
// 1. Cache side
// ---------------------------------------------------------------------------

/// Directory in the cache that holds `category` files for `date`.
pub fn cache_dir(category: Category, cache_root: &Path, date: &WorkingDate) -> PathBuf {
    match category {
        Category::Miniseed | Category::Soh => {
            cache_root.join("miniseed").join(date.year_token())
        }
        Category::Latency => cache_root.join("latency"),
    }
}

/// Glob-style rendering of the cache pattern, for log output.
pub fn cache_pattern(category: Category, date: &WorkingDate) -> String {
    let (year, day) = (date.year_token(), date.julian());
    match category {
        Category::Soh => format!("*.SOH.{year}.{day}"),
        Category::Miniseed => format!("*.*.*.*.{year}.{day}"),
        Category::Latency => format!("*_*_*_*_{year}_{day}.csv"),
    }
}

/// Whether a cache file name belongs to `category` on `date`.
pub fn matches(category: Category, file_name: &str, date: &WorkingDate, padding: DayPadding) -> bool {
    match category {
        Category::Soh => strip_date_suffix(file_name, '.', date, padding)
            .and_then(|head| head.strip_suffix(".SOH"))
            .is_some_and(|station| !station.is_empty()),
        Category::Miniseed => strip_date_suffix(file_name, '.', date, padding)
            .is_some_and(|head| is_channel_id(head, '.')),
        Category::Latency => file_name
            .strip_suffix(".csv")
            .and_then(|stem| strip_date_suffix(stem, '_', date, padding))
            .is_some_and(|head| {
                let fields: Vec<&str> = head.split('_').collect();
                fields.len() >= 4 && fields.iter().all(|f| !f.is_empty())
            }),
    }
}

/// Splits `<head><sep><YYYY><sep><day>` and returns `<head>` when year and
/// day name `date`.
pub fn strip_date_suffix<'a>(
    name: &'a str,
    sep: char,
    date: &WorkingDate,
    padding: DayPadding,
) -> Option<&'a str> {
    let (rest, day) = name.rsplit_once(sep)?;
    let (head, year) = rest.rsplit_once(sep)?;
    (year == date.year_token() && padding.accepts(day, date)).then_some(head)
}

/// `NN<sep>STA<sep>LOC<sep>CHA` with an optional (empty) location code.
/// An `SOH` channel is state-of-health data, not a waveform.
pub fn is_channel_id(head: &str, sep: char) -> bool {
    let fields: Vec<&str> = head.split(sep).collect();
    match fields.as_slice() {
        [net, sta, _loc, cha] => {
            !net.is_empty() && !sta.is_empty() && !cha.is_empty() && *cha != "SOH"
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// 2. Archive side
// ---------------------------------------------------------------------------

/// `<archive_root>/<category>/<YYYY>/<MM>/<DD>` — pure, no I/O.
pub fn archive_dir(category: Category, archive_root: &Path, date: &WorkingDate) -> PathBuf {
    archive_root
        .join(category.dir_name())
        .join(format!("{:04}", date.year()))
        .join(format!("{:02}", date.month()))
        .join(format!("{:02}", date.day()))
}

/// Create `path` and any missing parents with mode `0755`.
///
/// No-op when the directory already exists; existing contents and modes
/// are left alone.
pub fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    if path.is_dir() {
        return Ok(());
    }

    let missing: Vec<PathBuf> = path
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .map(Path::to_path_buf)
        .collect();

    std::fs::create_dir_all(path).map_err(|e| io_err(path, e))?;
    for dir in missing.iter().rev() {
        set_dir_permissions(dir)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(ARCHIVE_DIR_MODE))
        .map_err(|e| io_err(path, e))
}

#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn feb14() -> WorkingDate {
        WorkingDate(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap())
    }

    #[test]
    fn archive_dir_is_category_then_date() {
        let dir = archive_dir(Category::Soh, Path::new("/data/archive"), &feb14());
        assert_eq!(dir, PathBuf::from("/data/archive/soh/2024/02/14"));
    }

    #[test]
    fn cache_dirs_follow_layout() {
        let root = Path::new("/var/cache/guralp");
        assert_eq!(
            cache_dir(Category::Soh, root, &feb14()),
            PathBuf::from("/var/cache/guralp/miniseed/2024")
        );
        assert_eq!(
            cache_dir(Category::Latency, root, &feb14()),
            PathBuf::from("/var/cache/guralp/latency")
        );
    }

    #[test]
    fn cache_pattern_uses_padded_day() {
        assert_eq!(cache_pattern(Category::Latency, &feb14()), "*_*_*_*_2024_045.csv");
    }

    #[test]
    fn miniseed_allows_empty_location_only() {
        let d = feb14();
        let p = DayPadding::Padded;
        assert!(matches(Category::Miniseed, "NN.STA01..HHZ.2024.045", &d, p));
        assert!(!matches(Category::Miniseed, ".STA01.00.HHZ.2024.045", &d, p));
        assert!(!matches(Category::Miniseed, "NN.STA01.00.HHZ.extra.2024.045", &d, p));
        assert!(!matches(Category::Miniseed, "NN.STA01.00.SOH.2024.045", &d, p));
    }

    #[test]
    fn ensure_dir_creates_parents_with_mode() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("soh").join("2024").join("02").join("14");
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            for p in [tmp.path().join("soh"), dir.clone()] {
                let mode = std::fs::metadata(&p).unwrap().permissions().mode() & 0o777;
                assert_eq!(mode, 0o755, "{}", p.display());
            }
        }
    }

    #[test]
    fn ensure_dir_fails_when_path_is_a_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();
        let err = ensure_dir(&file).unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }), "got: {err}");
    }
}
