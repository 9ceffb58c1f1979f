//! Optional YAML configuration file.
//!
//! # Lookup order
//!
//! 1. an explicit path (`--config` / `$GURALP_ARCHIVE_CONFIG`) — must exist
//! 2. `<config_dir>/guralp-archive/config.yaml` — used when present
//! 3. built-in defaults
//!
//! Command-line flags override whatever the file provides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};
use crate::types::{Category, DayPadding};

pub const CONFIG_ENV: &str = "GURALP_ARCHIVE_CONFIG";
pub const DEFAULT_CACHE_DIR: &str = "/var/cache/guralp";
pub const DEFAULT_ARCHIVE_DIR: &str = "/data/archive";
pub const DEFAULT_RSYNC: &str = "rsync";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Cache root used for any category without its own override.
    pub cache_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub miniseed_cache_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soh_cache_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_cache_dir: Option<PathBuf>,
    pub archive_dir: PathBuf,
    /// Program invoked for bulk relocation and remote mirroring.
    pub rsync_program: PathBuf,
    pub day_padding: DayPadding,
    /// `EnvFilter` directive, e.g. `info` or `debug`.
    pub log_level: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            miniseed_cache_dir: None,
            soh_cache_dir: None,
            latency_cache_dir: None,
            archive_dir: PathBuf::from(DEFAULT_ARCHIVE_DIR),
            rsync_program: PathBuf::from(DEFAULT_RSYNC),
            day_padding: DayPadding::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ArchiveConfig {
    /// Cache root for `category`, honouring per-category overrides.
    pub fn cache_dir_for(&self, category: Category) -> &Path {
        let specific = match category {
            Category::Miniseed => self.miniseed_cache_dir.as_deref(),
            Category::Soh => self.soh_cache_dir.as_deref(),
            Category::Latency => self.latency_cache_dir.as_deref(),
        };
        specific.unwrap_or(&self.cache_dir)
    }
}

/// `<config_dir>/guralp-archive/config.yaml`, if a config dir is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("guralp-archive").join("config.yaml"))
}

/// Parse the config file at `path`.
pub fn load_at(path: &Path) -> Result<ArchiveConfig, CoreError> {
    if !path.exists() {
        return Err(CoreError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(ArchiveConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| CoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve and load configuration.
///
/// An explicit path must exist; the default location is optional.
pub fn load(explicit: Option<&Path>) -> Result<ArchiveConfig, CoreError> {
    if let Some(path) = explicit {
        return load_at(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_at(&path),
        _ => Ok(ArchiveConfig::default()),
    }
}
