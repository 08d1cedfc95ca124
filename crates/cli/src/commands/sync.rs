// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The `sync` command: one run of the sync coordinator against the
//! configured remote, committing the cursor back into the config file.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use ms_core::{MatchSource, SyncCoordinator, SyncPlan, SyncReport};

use crate::cli::OutputFormat;
use crate::config::ConfigFile;
use crate::error::Result;
use crate::http::HttpMatchSource;
use crate::lock::RunLock;

use super::{open_store, to_json};

/// Result of a sync command.
#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// `--dry-run`: nothing fetched or written.
    Planned(SyncPlan),
    Completed(SyncReport),
}

pub fn run(
    config_path: &Path,
    dry_run: bool,
    max_matches: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let mut file = ConfigFile::load(config_path)?;
    let source = HttpMatchSource::new(file.config.base_url.clone(), file.config.request_timeout())?;
    tracing::info!(remote = %source.base_url(), dry_run, "starting sync");

    let outcome = run_impl(&source, &mut file, dry_run, max_matches)?;
    println!("{}", render(&outcome, format)?);
    Ok(())
}

/// Plan or run one sync against `source`.
///
/// `max_matches` overrides the configured per-run cap for this run only;
/// `Some(0)` lifts the cap.
pub(crate) fn run_impl<S: MatchSource + ?Sized>(
    source: &S,
    file: &mut ConfigFile,
    dry_run: bool,
    max_matches: Option<u64>,
) -> Result<SyncOutcome> {
    let mut options = file.config.sync_options()?;
    if let Some(cap) = max_matches {
        options.max_matches_per_run = (cap > 0).then_some(cap);
    }

    let _lock = if dry_run {
        None
    } else {
        Some(RunLock::acquire(&file.db_path())?)
    };
    let mut store = open_store(file)?;
    let mut coordinator = SyncCoordinator::new(source, &mut store, options);

    if dry_run {
        return Ok(SyncOutcome::Planned(coordinator.plan()?));
    }

    let mut state = file.config.sync_state();
    let report = coordinator.run(&mut state, file)?;
    Ok(SyncOutcome::Completed(report))
}

fn render_plan(out: &mut String, plan: &SyncPlan) {
    let _ = writeln!(
        out,
        "Remote: {} matches, stored: {}, new: {}",
        plan.total_matches, plan.stored_count, plan.delta
    );
    if let Some(boundary) = plan.boundary_index {
        let _ = writeln!(
            out,
            "Incomplete: {} (oldest at #{})",
            plan.incomplete_matches, boundary
        );
    }
}

pub(crate) fn render(outcome: &SyncOutcome, format: OutputFormat) -> Result<String> {
    if let OutputFormat::Json = format {
        return to_json(outcome);
    }

    let mut out = String::new();
    match outcome {
        SyncOutcome::Planned(plan) => {
            render_plan(&mut out, plan);
            let _ = write!(out, "Would fetch {} matches", plan.required_matches);
            if plan.capped {
                let _ = write!(out, " (capped)");
            }
        }
        SyncOutcome::Completed(report) => {
            render_plan(&mut out, &report.plan);
            let _ = writeln!(
                out,
                "Fetched {} page(s), {} record(s)",
                report.pages_fetched, report.records_fetched
            );
            let _ = write!(
                out,
                "Synced: {} new, {} updated, {} unchanged; {} matches stored",
                report.summary.inserted,
                report.summary.updated,
                report.summary.unchanged,
                report.stored_count
            );
            if report.plan.capped {
                let _ = write!(
                    out,
                    "\nnote: fetch was capped at {} matches; older matches were not fetched.\n  \
                     hint: rerun with --max-matches 0 (or a larger cap) to backfill",
                    report.plan.required_matches
                );
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
