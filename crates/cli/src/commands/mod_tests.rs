// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Test infrastructure for command testing.
//!
//! `TestContext` holds a config file in a temp directory plus its opened
//! store. `FixedSource` serves a fixed history without any network.

use std::cell::RefCell;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;

use ms_core::{
    Match, MatchClassifier, MatchSource, MatchStore, Page, RawMatch, TotalMatches,
    MATCH_STATE_COMPLETE,
};

use crate::config::{Config, ConfigFile};

use super::open_store;

pub const IN_PROGRESS: i64 = 2;

pub fn match_time(n: u64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(n as i64)
}

pub fn raw(n: u64, state: i64, match_type: &str, duration: Option<i64>) -> RawMatch {
    let mut value = json!({
        "matchId": format!("m-{n:05}"),
        "dataString": { "type": match_type },
        "createDate": match_time(n).to_rfc3339(),
        "matchStateId": state.to_string(),
    });
    if let Some(d) = duration {
        value["dataInteger"] = json!({ "duration": d });
    }
    RawMatch::from_value(value).expect("valid fixture")
}

pub fn finished(n: u64) -> RawMatch {
    raw(n, MATCH_STATE_COMPLETE, "1v1Ranked", Some(300))
}

/// Config file plus opened store in a temp directory.
pub struct TestContext {
    pub file: ConfigFile,
    pub store: MatchStore,
    pub temp: TempDir,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("matchsync.json");
        let config = Config::new(
            "https://api.example.test/matches".to_string(),
            "matches".to_string(),
        )
        .expect("Failed to create config");
        let file = ConfigFile { path, config };
        file.save().expect("Failed to save config");
        let store = open_store(&file).expect("Failed to open store");
        TestContext { file, store, temp }
    }

    /// Store `raw` at absolute index `index`, classified with the default policy.
    pub fn store_match(&mut self, raw: RawMatch, index: u64) {
        let classification = MatchClassifier::default().classify(&raw);
        self.store
            .put_batch(&[Match::from_raw(raw, index, classification)])
            .expect("Failed to store match");
    }

    pub fn reload_config(&self) -> Config {
        Config::load(&self.file.path).expect("Failed to reload config")
    }
}

/// Remote history held in memory, oldest first.
pub struct FixedSource {
    pub history: Vec<RawMatch>,
    /// Offsets requested through `fetch_page`, in call order.
    pub requested: RefCell<Vec<u64>>,
}

impl FixedSource {
    pub fn new(history: Vec<RawMatch>) -> Self {
        FixedSource {
            history,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn finished(count: u64) -> Self {
        Self::new((0..count).map(finished).collect())
    }
}

impl MatchSource for FixedSource {
    fn total_count(&self) -> ms_core::Result<TotalMatches> {
        Ok(TotalMatches::new(self.history.len() as u64))
    }

    fn fetch_page(&self, offset: u64) -> ms_core::Result<Page> {
        self.requested.borrow_mut().push(offset);
        let records = self
            .history
            .iter()
            .rev()
            .skip(offset as usize)
            .take(self.page_size() as usize)
            .cloned()
            .collect();
        Ok(Page::new(offset, records))
    }
}
