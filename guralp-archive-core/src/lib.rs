//! Guralp archive core library — archive naming convention, domain types,
//! configuration and errors.
//!
//! Public API surface:
//! - [`types`] — [`Category`], [`WorkingDate`], [`DayPadding`]
//! - [`paths`] — cache patterns, archive directories, directory creation
//! - [`config`] — YAML configuration file
//! - [`error`] — [`CoreError`]

pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use config::ArchiveConfig;
pub use error::CoreError;
pub use types::{Category, DayPadding, WorkingDate};
