// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    network = { Error::Network("timed out".into()), "timed out" },
    http_status = { Error::HttpStatus { status: 503, url: "http://x".into() }, "503" },
    malformed = { Error::MalformedPage { offset: 50, reason: "bad".into() }, "offset 50" },
    rank_policy = { Error::InvalidRankPolicy("fast".into()), "duration-gated" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[parameterized(
    network = { Error::Network("reset".into()), true },
    http_status = { Error::HttpStatus { status: 500, url: "u".into() }, true },
    malformed = { Error::MalformedPage { offset: 0, reason: "r".into() }, false },
    not_found = { Error::MatchNotFound("m".into()), false },
)]
fn error_transience(err: Error, transient: bool) {
    assert_eq!(err.is_transient(), transient);
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
