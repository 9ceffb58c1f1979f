//! Domain types for the station archive.
//!
//! A [`WorkingDate`] drives both sides of the naming convention: the
//! `YYYY.JJJ` / `YYYY_JJJ` suffix found on cache files and the `YYYY/MM/DD`
//! directory they land in under the archive root.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The kind of station data file. Determines the archive subdirectory and
/// the filename pattern searched for in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Miniseed,
    Soh,
    Latency,
}

impl Category {
    /// Order in which the relocator drains the cache. SOH goes before
    /// miniseed because both live in the same cache directory.
    pub const RELOCATE_ORDER: [Category; 3] = [Category::Soh, Category::Miniseed, Category::Latency];

    /// Order in which the synchronizer mirrors a remote archive.
    pub const MIRROR_ORDER: [Category; 3] = [Category::Miniseed, Category::Latency, Category::Soh];

    /// Subdirectory name under the archive root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Category::Miniseed => "miniseed",
            Category::Soh => "soh",
            Category::Latency => "latency",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "miniseed" => Ok(Category::Miniseed),
            "soh" => Ok(Category::Soh),
            "latency" => Ok(Category::Latency),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkingDate
// ---------------------------------------------------------------------------

/// A calendar date (no time of day) that a run operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingDate(pub NaiveDate);

impl WorkingDate {
    /// Command-line and config date format.
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a `YYYY-MM-DD` string.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        NaiveDate::parse_from_str(input.trim(), Self::FORMAT)
            .map(Self)
            .map_err(|source| CoreError::InvalidDate {
                input: input.to_string(),
                source,
            })
    }

    /// `today` minus `days` calendar days.
    pub fn days_before(today: NaiveDate, days: i64) -> Self {
        Self(today - Duration::days(days))
    }

    /// Yesterday in local time; the default working date of every tool.
    pub fn yesterday() -> Self {
        Self::days_before(Local::now().date_naive(), 1)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Day of year, 1-366.
    pub fn ordinal(&self) -> u32 {
        self.0.ordinal()
    }

    /// Four-digit year token as it appears in file names.
    pub fn year_token(&self) -> String {
        self.0.format("%Y").to_string()
    }

    /// Canonical day-of-year token: always three digits, zero padded.
    pub fn julian(&self) -> String {
        self.0.format("%j").to_string()
    }

    /// Archive date partition, `YYYY/MM/DD`.
    pub fn date_path(&self) -> String {
        self.0.format("%Y/%m/%d").to_string()
    }
}

impl fmt::Display for WorkingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for WorkingDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for WorkingDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

// ---------------------------------------------------------------------------
// DayPadding
// ---------------------------------------------------------------------------

/// Which day-of-year spellings count as a match when searching the cache.
///
/// New files are always named with the padded token. `Lenient` exists for
/// caches still holding files written with an unpadded day (`2024_45`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPadding {
    /// Only `045`.
    #[default]
    Padded,
    /// `045` or `45`.
    Lenient,
}

impl DayPadding {
    /// Whether `token` names the day of `date` under this convention.
    pub fn accepts(self, token: &str, date: &WorkingDate) -> bool {
        if token == date.julian() {
            return true;
        }
        self == DayPadding::Lenient && token == date.ordinal().to_string()
    }
}

impl fmt::Display for DayPadding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPadding::Padded => write!(f, "padded"),
            DayPadding::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for DayPadding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "padded" => Ok(DayPadding::Padded),
            "lenient" => Ok(DayPadding::Lenient),
            other => Err(CoreError::UnknownPadding(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
