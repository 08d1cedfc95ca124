// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ms_core::{Match, MatchStore};

use crate::cli::OutputFormat;
use crate::config::ConfigFile;
use crate::display::format_match_line;
use crate::error::Result;

use super::{open_store, to_json};

pub fn run(config_path: &Path, limit: Option<usize>, format: OutputFormat) -> Result<()> {
    let file = ConfigFile::load(config_path)?;
    let store = open_store(&file)?;
    let matches = run_impl(&store, limit)?;
    println!("{}", render(&matches, format)?);
    Ok(())
}

/// Rankable matches, oldest first.
pub(crate) fn run_impl(store: &MatchStore, limit: Option<usize>) -> Result<Vec<Match>> {
    Ok(store.rankable_matches(limit)?)
}

pub(crate) fn render(matches: &[Match], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(&matches),
        OutputFormat::Text if matches.is_empty() => Ok("No rankable matches".to_string()),
        OutputFormat::Text => Ok(matches
            .iter()
            .map(format_match_line)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
#[path = "rankable_tests.rs"]
mod tests;
