//! guralp-archive — move station data from the acquisition cache into the
//! dated archive, and mirror archives between hosts.
//!
//! # Usage
//!
//! ```text
//! guralp-archive relocate [-c <cache>] [-a <archive>] [-d YYYY-MM-DD] [--bulk] [--dry-run]
//! guralp-archive mirror -s <host> [-u <user>] -a <remote archive> [-d <destination>] [-t YYYY-MM-DD] [--strict]
//! guralp-archive fix-cache [-c <cache>] [-d YYYY-MM-DD] [--dry-run]
//! ```
//!
//! Every subcommand defaults to yesterday's date.

mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{fix_cache::FixCacheArgs, mirror::MirrorArgs, relocate::RelocateArgs};
use guralp_archive_core::{config, ArchiveConfig};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "guralp-archive",
    version,
    about = "Archive Guralp station data by date and mirror archives between hosts",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Move one day of cache files into the archive.
    Relocate(RelocateArgs),

    /// Pull one day of every category from a remote archive.
    Mirror(MirrorArgs),

    /// Rename misfiled miniseed files into the standard cache layout.
    FixCache(FixCacheArgs),
}

/// Options accepted by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// YAML config file (default: $GURALP_ARCHIVE_CONFIG, then the user config dir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Sets logging level to DEBUG.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit a machine-readable JSON report on stdout.
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalArgs {
    fn load_config(&self) -> Result<ArchiveConfig> {
        let explicit = self
            .config
            .clone()
            .or_else(|| std::env::var_os(config::CONFIG_ENV).map(PathBuf::from));
        config::load(explicit.as_deref()).context("failed to load configuration")
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.global.load_config()?;
    let subscriber = logging::subscriber(cli.global.verbose, &config.log_level);

    tracing::subscriber::with_default(subscriber, || match cli.command {
        Commands::Relocate(args) => args.run(&cli.global, &config),
        Commands::Mirror(args) => args.run(&cli.global, &config),
        Commands::FixCache(args) => args.run(&cli.global, &config),
    })
}
