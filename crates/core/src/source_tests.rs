// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::test_helpers::ScriptedSource;
use yare::parameterized;

#[test]
fn parse_page_body() {
    let body = r#"[
        {"matchId": "b", "dataString": {"type": "1v1Ranked"}, "createDate": "2024-01-01T10:05:00Z", "matchStateId": "6", "dataInteger": {"duration": 300}},
        {"matchId": "a", "dataString": {"type": "1v1Unranked"}, "createDate": "2024-01-01T10:00:00Z", "matchStateId": "3"}
    ]"#;
    let page = Page::parse(50, body).unwrap();

    assert_eq!(page.offset, 50);
    assert_eq!(page.record_count(), 2);
    assert_eq!(page.records[0].match_id, "b");
    assert_eq!(page.records[1].match_state, 3);
}

#[test]
fn parse_empty_page() {
    let page = Page::parse(0, "[]").unwrap();
    assert_eq!(page.record_count(), 0);
}

#[parameterized(
    not_json = { "<html>502</html>" },
    not_array = { r#"{"matchId": "a"}"# },
    bad_element = { r#"[{"matchId": "a"}]"# },
)]
fn parse_rejects_malformed_page(body: &str) {
    let err = Page::parse(100, body).unwrap_err();
    assert!(matches!(err, Error::MalformedPage { offset: 100, .. }));
}

#[test]
fn one_bad_record_rejects_whole_page() {
    let body = r#"[
        {"matchId": "b", "dataString": {"type": "1v1Ranked"}, "createDate": "2024-01-01T10:05:00Z", "matchStateId": "6"},
        {"matchId": "a", "dataString": {"type": "1v1Ranked"}, "createDate": "not a date", "matchStateId": "6"}
    ]"#;
    let err = Page::parse(0, body).unwrap_err();
    assert!(err.to_string().contains("record 1"));
}

#[parameterized(
    nothing = { 0, vec![] },
    one = { 1, vec![0] },
    exact_page = { 50, vec![0] },
    example = { 120, vec![0, 50, 100] },
)]
fn fetch_pages_covering_requests_ceil_pages(matches: u64, offsets: Vec<u64>) {
    let source = ScriptedSource::with_history(500);
    source.fetch_pages_covering(matches).unwrap();
    assert_eq!(*source.requested.borrow(), offsets);
}

#[test]
fn fetch_pages_covering_returns_50_50_20() {
    let source = ScriptedSource::with_history(120);
    let pages = source.fetch_pages_covering(120).unwrap();
    let counts: Vec<usize> = pages.iter().map(Page::record_count).collect();
    assert_eq!(counts, vec![50, 50, 20]);
}

#[test]
fn fetch_pages_covering_stops_at_short_page() {
    let source = ScriptedSource::with_history(70);
    let pages = source.fetch_pages_covering(500).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(*source.requested.borrow(), vec![0, 50]);
}

#[test]
fn fetch_pages_covering_propagates_failure() {
    let source = ScriptedSource::with_history(200);
    source.fail_at(Some(100));

    let err = source.fetch_pages_covering(200).unwrap_err();
    assert!(err.is_transient());
    assert_eq!(*source.requested.borrow(), vec![0, 50, 100]);
}
