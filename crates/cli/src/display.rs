// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, SecondsFormat, Utc};
use ms_core::Match;

/// Render a duration in seconds as `Xm YYs`, or `-` when unknown.
pub fn format_duration(secs: Option<i64>) -> String {
    match secs {
        Some(s) if s >= 0 => format!("{}m{:02}s", s / 60, s % 60),
        Some(s) => format!("{s}s"),
        None => "-".to_string(),
    }
}

pub fn format_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a match as a single line:
/// `#index id (type) created duration state=N: reason`
pub fn format_match_line(m: &Match) -> String {
    format!(
        "#{} {} ({}) {} {} state={}: {}",
        m.match_index,
        m.match_id,
        m.match_type,
        format_time(&m.created_date),
        format_duration(m.duration_secs),
        m.match_state,
        m.classification.reason
    )
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
