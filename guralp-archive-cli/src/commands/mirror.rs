//! `guralp-archive mirror` — pull one day of a remote archive.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use guralp_archive_core::{ArchiveConfig, WorkingDate};
use guralp_archive_sync::{mirror_archive, MirrorReport, RemoteArchive, Rsync};

use super::{print_json, working_date};
use crate::GlobalArgs;

/// Arguments for `guralp-archive mirror`.
#[derive(Args, Debug)]
pub struct MirrorArgs {
    /// The IP or hostname to sync archive data from.
    #[arg(short, long)]
    pub source: String,

    /// The user to connect to the remote host as.
    #[arg(short, long)]
    pub user: Option<String>,

    /// The parent directory of the archive on the remote host.
    #[arg(short, long)]
    pub archive: PathBuf,

    /// Local directory to sync into (default: same path as --archive).
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Date to sync, YYYY-MM-DD (default: yesterday).
    #[arg(short = 't', long)]
    pub date: Option<WorkingDate>,

    /// Exit non-zero if any category failed to sync.
    #[arg(long)]
    pub strict: bool,
}

impl MirrorArgs {
    pub fn run(self, global: &GlobalArgs, config: &ArchiveConfig) -> Result<()> {
        let date = working_date(self.date);
        let destination = self.destination.unwrap_or_else(|| self.archive.clone());
        let mut remote = RemoteArchive::new(self.source, self.archive);
        if let Some(user) = self.user {
            remote = remote.with_user(user);
        }

        let rsync = Rsync::with_program(&config.rsync_program);
        let report = mirror_archive(&rsync, &remote, &destination, &date)
            .with_context(|| format!("cannot mirror {date} from {}", remote.host))?;

        if global.json {
            print_json(&json_report(&report))?;
        } else {
            print_report(&report);
        }

        let failed = report.failures().count();
        if failed > 0 {
            tracing::error!("{failed} categor(ies) failed to sync for {date}");
            if self.strict {
                bail!("{failed} categor(ies) failed to sync for {date}");
            }
        }
        Ok(())
    }
}

fn json_report(report: &MirrorReport) -> serde_json::Value {
    let categories: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(_) => serde_json::json!({ "category": o.category, "ok": true }),
            Err(e) => serde_json::json!({
                "category": o.category,
                "ok": false,
                "error": e.to_string(),
            }),
        })
        .collect();
    serde_json::json!({
        "date": report.date,
        "destination": report.destination,
        "categories": categories,
    })
}

fn print_report(report: &MirrorReport) {
    for o in &report.outcomes {
        match &o.result {
            Ok(_) => println!("{} {} {}", "✓".green(), o.category, report.date),
            Err(e) => println!("{} {} {}: {e}", "✗".red(), o.category, report.date),
        }
    }
}
