// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use ms_core::{reconcile_cutoff, Match, MatchStore};

use crate::cli::OutputFormat;
use crate::config::ConfigFile;
use crate::display::{format_match_line, format_time};
use crate::error::Result;

use super::{open_store, to_json};

/// Incomplete matches the next sync will re-fetch.
#[derive(Debug, Serialize)]
pub struct IncompleteReport {
    /// Matches created at or before this instant are no longer reconciled.
    pub cutoff: Option<DateTime<Utc>>,
    pub matches: Vec<Match>,
}

pub fn run(config_path: &Path, format: OutputFormat) -> Result<()> {
    let file = ConfigFile::load(config_path)?;
    let store = open_store(&file)?;
    let window = file.config.reconcile_window()?;
    let report = run_impl(&store, window)?;
    println!("{}", render(&report, format)?);
    Ok(())
}

pub(crate) fn run_impl(store: &MatchStore, window: Duration) -> Result<IncompleteReport> {
    let Some(latest) = store.latest_known_time()? else {
        return Ok(IncompleteReport {
            cutoff: None,
            matches: Vec::new(),
        });
    };
    let cutoff = reconcile_cutoff(latest, window)?;
    Ok(IncompleteReport {
        cutoff: Some(cutoff),
        matches: store.find_incomplete_since(cutoff)?,
    })
}

pub(crate) fn render(report: &IncompleteReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Text => {
            let Some(cutoff) = report.cutoff else {
                return Ok("Store is empty".to_string());
            };
            if report.matches.is_empty() {
                return Ok(format!(
                    "No incomplete matches after {}",
                    format_time(&cutoff)
                ));
            }
            let mut out = format!(
                "{} incomplete match(es) after {}:",
                report.matches.len(),
                format_time(&cutoff)
            );
            for m in &report.matches {
                let _ = write!(out, "\n  {}", format_match_line(m));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "incomplete_tests.rs"]
mod tests;
