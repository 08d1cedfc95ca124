// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use ms_core::MatchStore;

use crate::cli::OutputFormat;
use crate::config::ConfigFile;
use crate::display::format_time;
use crate::error::Result;

use super::{open_store, to_json};

/// Snapshot of the cursor and local store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub base_url: String,
    pub store: String,
    pub next_record_index: u64,
    pub stored_matches: u64,
    pub latest_match: Option<DateTime<Utc>>,
    pub incomplete_matches: u64,
    pub rankable_matches: u64,
}

impl StatusReport {
    /// The cursor disagrees with the store, e.g. after a crash between the
    /// store write and the cursor commit.
    pub fn cursor_drift(&self) -> bool {
        self.next_record_index != self.stored_matches
    }
}

pub fn run(config_path: &Path, format: OutputFormat) -> Result<()> {
    let file = ConfigFile::load(config_path)?;
    let store = open_store(&file)?;
    let report = run_impl(&file, &store)?;
    println!("{}", render(&report, format)?);
    Ok(())
}

pub(crate) fn run_impl(file: &ConfigFile, store: &MatchStore) -> Result<StatusReport> {
    Ok(StatusReport {
        base_url: file.config.base_url.clone(),
        store: file.db_path().display().to_string(),
        next_record_index: file.config.next_record_index,
        stored_matches: store.count()?,
        latest_match: store.latest_known_time()?,
        incomplete_matches: store.count_incomplete()?,
        rankable_matches: store.count_rankable()?,
    })
}

pub(crate) fn render(report: &StatusReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "Remote: {}", report.base_url);
            let _ = writeln!(out, "Store: {}", report.store);
            let _ = writeln!(out, "Cursor: {}", report.next_record_index);
            let _ = writeln!(out, "Stored matches: {}", report.stored_matches);
            let latest = report
                .latest_match
                .as_ref()
                .map(format_time)
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(out, "Latest match: {latest}");
            let _ = writeln!(out, "Incomplete: {}", report.incomplete_matches);
            let _ = write!(out, "Rankable: {}", report.rankable_matches);
            if report.cursor_drift() {
                let _ = write!(
                    out,
                    "\nwarning: cursor differs from stored count; the next sync will correct it"
                );
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
