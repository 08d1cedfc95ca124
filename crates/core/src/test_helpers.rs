// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers: match fixtures and a scripted remote.

#![allow(clippy::unwrap_used)]

use std::cell::{Cell, RefCell};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use crate::error::{Error, Result};
use crate::index::{TotalMatches, PAGE_SIZE};
use crate::model::{RawMatch, MATCH_STATE_COMPLETE};
use crate::source::{MatchSource, Page};
use crate::state::SyncState;
use crate::sync::CursorSink;

/// Creation time of the `n`-th match of a scripted history.
pub fn match_time(n: u64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(n as i64)
}

/// Build a raw match the way the remote would serve it.
pub fn raw_match(
    id: &str,
    created: DateTime<Utc>,
    state: i64,
    match_type: &str,
    duration: Option<i64>,
) -> RawMatch {
    let mut value = json!({
        "matchId": id,
        "dataString": { "type": match_type },
        "createDate": created.to_rfc3339(),
        "matchStateId": state.to_string(),
    });
    if let Some(d) = duration {
        value["dataInteger"] = json!({ "duration": d });
    }
    RawMatch::from_value(value).unwrap()
}

/// A finished ranked match lasting 150 seconds.
pub fn finished_match(n: u64) -> RawMatch {
    raw_match(
        &format!("m-{n:05}"),
        match_time(n),
        MATCH_STATE_COMPLETE,
        "1v1Ranked",
        Some(150),
    )
}

/// In-memory remote history, stored oldest first.
pub struct ScriptedSource {
    history: RefCell<Vec<RawMatch>>,
    page_size: u64,
    /// Offsets requested through `fetch_page`, in call order.
    pub requested: RefCell<Vec<u64>>,
    pub total_calls: Cell<usize>,
    fail_offset: Cell<Option<u64>>,
    fail_total: Cell<bool>,
}

impl ScriptedSource {
    pub fn with_history(count: u64) -> Self {
        Self::from_matches((0..count).map(finished_match).collect())
    }

    pub fn from_matches(history: Vec<RawMatch>) -> Self {
        ScriptedSource {
            history: RefCell::new(history),
            page_size: PAGE_SIZE,
            requested: RefCell::new(Vec::new()),
            total_calls: Cell::new(0),
            fail_offset: Cell::new(None),
            fail_total: Cell::new(false),
        }
    }

    /// Append newly played matches.
    pub fn play(&self, count: u64) {
        let mut history = self.history.borrow_mut();
        let start = history.len() as u64;
        history.extend((start..start + count).map(finished_match));
    }

    pub fn push(&self, raw: RawMatch) {
        self.history.borrow_mut().push(raw);
    }

    /// Replace the record with the same id (e.g. a match that finished).
    pub fn replace(&self, raw: RawMatch) {
        let mut history = self.history.borrow_mut();
        if let Some(slot) = history.iter_mut().find(|m| m.match_id == raw.match_id) {
            *slot = raw;
        }
    }

    pub fn fail_at(&self, offset: Option<u64>) {
        self.fail_offset.set(offset);
    }

    pub fn fail_total(&self, fail: bool) {
        self.fail_total.set(fail);
    }

    pub fn reset_calls(&self) {
        self.requested.borrow_mut().clear();
        self.total_calls.set(0);
    }
}

impl MatchSource for ScriptedSource {
    fn total_count(&self) -> Result<TotalMatches> {
        self.total_calls.set(self.total_calls.get() + 1);
        if self.fail_total.get() {
            return Err(Error::Network("scripted failure".into()));
        }
        Ok(TotalMatches::new(self.history.borrow().len() as u64))
    }

    fn fetch_page(&self, offset: u64) -> Result<Page> {
        self.requested.borrow_mut().push(offset);
        if self.fail_offset.get() == Some(offset) {
            return Err(Error::HttpStatus {
                status: 502,
                url: format!("scripted?offset={offset}"),
            });
        }

        let history = self.history.borrow();
        let len = history.len() as u64;
        let newest = len.saturating_sub(offset);
        let oldest = newest.saturating_sub(self.page_size);
        let records = history[oldest as usize..newest as usize]
            .iter()
            .rev()
            .cloned()
            .collect();
        Ok(Page::new(offset, records))
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }
}

/// Cursor sink that keeps every committed state in memory.
#[derive(Default)]
pub struct RecordingSink {
    pub commits: Vec<SyncState>,
    pub fail: bool,
}

impl CursorSink for RecordingSink {
    fn commit(&mut self, state: &SyncState) -> Result<()> {
        if self.fail {
            return Err(Error::Cursor("scripted failure".into()));
        }
        self.commits.push(state.clone());
        Ok(())
    }
}
