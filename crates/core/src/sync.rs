// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync coordinator: one run of remote-to-local match ingestion.
//!
//! # Phases
//!
//! ```text
//! Idle ─► ComputingDelta ─► Reconciling ─► Fetching ─► Persisting ─► Done
//!               │                │             │            │
//!               └────────────────┴─────────────┴────────────┴──► Failed
//! ```
//!
//! 1. **ComputingDelta** snapshots the remote total `T` and the stored
//!    count `C`; `delta = max(T - C, 0)`.
//! 2. **Reconciling** looks for stored matches that were still running
//!    within the reconcile window before the newest stored match. The
//!    oldest of them sets a boundary the fetch must reach back to.
//! 3. **Fetching** pulls `max(delta, T - boundary)` matches (capped by
//!    [`SyncOptions::max_matches_per_run`]), newest first.
//! 4. **Persisting** indexes every record against the single `T` snapshot,
//!    classifies it, writes the batch, then commits the cursor.
//!
//! Nothing is written before every page has been fetched and parsed, and
//! the cursor is committed only after the batch is stored. A failed run
//! can be repeated as-is.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;

use crate::classify::MatchClassifier;
use crate::error::{Error, Result};
use crate::index::{PageIndexer, TotalMatches};
use crate::model::Match;
use crate::source::{MatchSource, Page};
use crate::state::SyncState;
use crate::store::{MatchStore, PutSummary};

/// Default per-run fetch cap, bounding API load during long catch-ups.
pub const DEFAULT_MAX_MATCHES_PER_RUN: u64 = 100;

/// Default look-back before the newest stored match for incomplete matches.
pub const DEFAULT_RECONCILE_WINDOW_HOURS: i64 = 24;

/// Tunables for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Upper bound on matches fetched per run; `None` disables the cap.
    pub max_matches_per_run: Option<u64>,
    pub reconcile_window: Duration,
    pub classifier: MatchClassifier,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            max_matches_per_run: Some(DEFAULT_MAX_MATCHES_PER_RUN),
            reconcile_window: Duration::hours(DEFAULT_RECONCILE_WINDOW_HOURS),
            classifier: MatchClassifier::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    ComputingDelta,
    Reconciling,
    Fetching,
    Persisting,
    Done,
    Failed,
}

impl SyncPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncPhase::Done | SyncPhase::Failed)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncPhase::Idle => "idle",
            SyncPhase::ComputingDelta => "computing delta",
            SyncPhase::Reconciling => "reconciling",
            SyncPhase::Fetching => "fetching",
            SyncPhase::Persisting => "persisting",
            SyncPhase::Done => "done",
            SyncPhase::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// What a run is going to fetch, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    pub total_matches: TotalMatches,
    pub stored_count: u64,
    /// Matches on the remote not yet stored locally.
    pub delta: u64,
    /// Oldest incomplete match index that must be re-fetched, if any.
    pub boundary_index: Option<u64>,
    pub incomplete_matches: usize,
    /// Lowest match index not stored locally. Below `stored_count` when an
    /// earlier capped run left older matches unfetched.
    pub first_missing_index: u64,
    pub required_matches: u64,
    /// True when the per-run cap reduced `required_matches`.
    pub capped: bool,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub plan: SyncPlan,
    pub pages_fetched: usize,
    pub records_fetched: usize,
    pub summary: PutSummary,
    /// Stored match count after the run; also the committed cursor.
    pub stored_count: u64,
}

/// Oldest creation time still reconciled: `latest - window`.
pub fn reconcile_cutoff(latest: DateTime<Utc>, window: Duration) -> Result<DateTime<Utc>> {
    latest
        .checked_sub_signed(window)
        .ok_or_else(|| Error::WindowOutOfRange(window.to_string()))
}

/// Durable home of the [`SyncState`] cursor.
///
/// `commit` must replace the previous state as a whole or not at all.
pub trait CursorSink {
    fn commit(&mut self, state: &SyncState) -> Result<()>;
}

/// Drives one sync run against a source and a store.
pub struct SyncCoordinator<'a, S: MatchSource + ?Sized> {
    source: &'a S,
    store: &'a mut MatchStore,
    options: SyncOptions,
    phase: SyncPhase,
}

impl<'a, S: MatchSource + ?Sized> SyncCoordinator<'a, S> {
    pub fn new(source: &'a S, store: &'a mut MatchStore, options: SyncOptions) -> Self {
        SyncCoordinator {
            source,
            store,
            options,
            phase: SyncPhase::Idle,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    fn enter(&mut self, phase: SyncPhase) {
        tracing::debug!(from = %self.phase, to = %phase, "sync phase");
        self.phase = phase;
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.enter(SyncPhase::Done),
            Err(e) => {
                tracing::warn!(phase = %self.phase, error = %e, "sync failed");
                self.enter(SyncPhase::Failed);
            }
        }
        result
    }

    /// Compute what a run would fetch without fetching any page.
    pub fn plan(&mut self) -> Result<SyncPlan> {
        let result = self.compute_plan();
        self.finish(result)
    }

    /// Run a full sync and commit the new cursor through `sink`.
    ///
    /// On failure `state` is left untouched.
    pub fn run(&mut self, state: &mut SyncState, sink: &mut dyn CursorSink) -> Result<SyncReport> {
        let result = self.run_phases(state, sink);
        self.finish(result)
    }

    fn compute_plan(&mut self) -> Result<SyncPlan> {
        self.enter(SyncPhase::ComputingDelta);
        let total = self.source.total_count()?;
        let stored_count = self.store.count()?;
        let delta = total.get().saturating_sub(stored_count);
        tracing::info!(total = %total, stored = stored_count, delta, "computed delta");

        self.enter(SyncPhase::Reconciling);
        let indexer = PageIndexer::new(total, self.source.page_size());
        let incomplete = match self.store.latest_known_time()? {
            Some(latest) => {
                let cutoff = reconcile_cutoff(latest, self.options.reconcile_window)?;
                self.store.find_incomplete_since(cutoff)?
            }
            None => Vec::new(),
        };
        let boundary_index = incomplete.first().map(|m| m.match_index);
        let reconcile_span = boundary_index
            .map(|index| indexer.distance_to_present(index))
            .unwrap_or(0);
        if let Some(index) = boundary_index {
            tracing::info!(
                incomplete = incomplete.len(),
                boundary = index,
                "re-fetching incomplete matches"
            );
        }

        let first_missing_index = self.store.first_missing_index()?;
        let backfill_span = if first_missing_index < stored_count {
            indexer.distance_to_present(first_missing_index)
        } else {
            0
        };
        if backfill_span > delta {
            tracing::warn!(
                first_missing = first_missing_index,
                "older matches missing locally, fetching back to them"
            );
        }

        let wanted = delta.max(backfill_span).max(reconcile_span);
        let (required_matches, capped) = match self.options.max_matches_per_run {
            Some(cap) if wanted > cap => {
                tracing::warn!(wanted, cap, "fetch capped for this run");
                (cap, true)
            }
            _ => (wanted, false),
        };

        Ok(SyncPlan {
            total_matches: indexer.total(),
            stored_count,
            delta,
            boundary_index,
            incomplete_matches: incomplete.len(),
            first_missing_index,
            required_matches,
            capped,
        })
    }

    fn run_phases(&mut self, state: &mut SyncState, sink: &mut dyn CursorSink) -> Result<SyncReport> {
        let plan = self.compute_plan()?;
        if state.next_record_index != plan.stored_count {
            tracing::warn!(
                cursor = state.next_record_index,
                stored = plan.stored_count,
                "cursor differs from stored match count"
            );
        }

        self.enter(SyncPhase::Fetching);
        let pages = if plan.required_matches > 0 {
            self.source.fetch_pages_covering(plan.required_matches)?
        } else {
            Vec::new()
        };
        let records_fetched = pages.iter().map(Page::record_count).sum();
        tracing::info!(pages = pages.len(), records = records_fetched, "fetched pages");

        self.enter(SyncPhase::Persisting);
        let indexer = PageIndexer::new(plan.total_matches, self.source.page_size());
        let pages_fetched = pages.len();
        let matches = self.index_pages(&indexer, pages)?;
        let summary = self.store.put_batch(&matches)?;
        let stored_count = self.store.count()?;

        let mut next = state.clone();
        next.next_record_index = stored_count;
        sink.commit(&next)?;
        *state = next;

        tracing::info!(
            inserted = summary.inserted,
            updated = summary.updated,
            unchanged = summary.unchanged,
            stored = stored_count,
            "sync complete"
        );

        Ok(SyncReport {
            plan,
            pages_fetched,
            records_fetched,
            summary,
            stored_count,
        })
    }

    /// Attach absolute indices and classifications to fetched records.
    fn index_pages(&self, indexer: &PageIndexer, pages: Vec<Page>) -> Result<Vec<Match>> {
        let page_total = pages.len();
        let mut matches = Vec::new();

        for (n, page) in pages.into_iter().enumerate() {
            let count = page.record_count();
            if n + 1 < page_total && (count as u64) < indexer.page_size() {
                tracing::warn!(offset = page.offset, count, "short page before end of history");
            }
            for (position, raw) in page.records.into_iter().enumerate() {
                let index = indexer.absolute_index(page.offset, count, position)?;
                let classification = self.options.classifier.classify(&raw);
                matches.push(Match::from_raw(raw, index, classification));
            }
        }

        Ok(matches)
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
