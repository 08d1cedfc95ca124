// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{finished, match_time, raw, TestContext, IN_PROGRESS};

#[test]
fn test_status_of_empty_store() {
    let ctx = TestContext::new();
    let report = run_impl(&ctx.file, &ctx.store).unwrap();

    assert_eq!(report.stored_matches, 0);
    assert_eq!(report.latest_match, None);
    assert!(!report.cursor_drift());

    let text = render(&report, OutputFormat::Text).unwrap();
    assert!(text.contains("Stored matches: 0"));
    assert!(text.contains("Latest match: -"));
}

#[test]
fn test_status_counts() {
    let mut ctx = TestContext::new();
    ctx.store_match(finished(0), 0);
    ctx.store_match(raw(1, 6, "1v1Ranked", Some(30)), 1);
    ctx.store_match(raw(2, IN_PROGRESS, "1v1Ranked", None), 2);
    ctx.file.config.next_record_index = 3;

    let report = run_impl(&ctx.file, &ctx.store).unwrap();

    assert_eq!(report.stored_matches, 3);
    assert_eq!(report.incomplete_matches, 1);
    assert_eq!(report.rankable_matches, 1);
    assert_eq!(report.latest_match, Some(match_time(2)));
    assert!(!report.cursor_drift());
}

#[test]
fn test_status_flags_cursor_drift() {
    let mut ctx = TestContext::new();
    ctx.store_match(finished(0), 0);

    let report = run_impl(&ctx.file, &ctx.store).unwrap();
    let text = render(&report, OutputFormat::Text).unwrap();

    assert!(report.cursor_drift());
    assert!(text.contains("warning: cursor differs"));
}

#[test]
fn test_status_json_keys() {
    let mut ctx = TestContext::new();
    ctx.store_match(finished(0), 0);
    let report = run_impl(&ctx.file, &ctx.store).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&render(&report, OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["storedMatches"], 1);
    assert_eq!(json["nextRecordIndex"], 0);
    assert_eq!(json["baseUrl"], "https://api.example.test/matches");
}
