// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use ms_core::{MatchClassifier, MatchType, RawMatch};
use yare::parameterized;

#[parameterized(
    unknown = { None, "-" },
    zero = { Some(0), "0m00s" },
    short = { Some(95), "1m35s" },
    long = { Some(3601), "60m01s" },
    negative = { Some(-3), "-3s" },
)]
fn test_format_duration(secs: Option<i64>, expected: &str) {
    assert_eq!(format_duration(secs), expected);
}

#[test]
fn test_format_match_line() {
    let raw = RawMatch {
        match_id: "m-00042".to_string(),
        match_type: MatchType::Ranked1v1,
        created_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        match_state: 6,
        duration_secs: Some(45),
        payload: serde_json::Value::Null,
    };
    let classification = MatchClassifier::default().classify(&raw);
    let m = Match::from_raw(raw, 42, classification);

    assert_eq!(
        format_match_line(&m),
        "#42 m-00042 (1v1Ranked) 2024-05-01T12:30:00Z 0m45s state=6: too short (45s, need more than 120s)"
    );
}
