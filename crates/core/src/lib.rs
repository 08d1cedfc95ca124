// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ms-core: match history synchronisation engine.
//!
//! This crate provides the data types, local store, page indexing,
//! rankability classification and sync coordination used by the
//! `matchsync` CLI. It has no network or command-line concerns: the remote
//! API is reached through the [`MatchSource`] trait.

pub mod classify;
pub mod error;
pub mod index;
pub mod model;
pub mod source;
pub mod state;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test_helpers;

pub use classify::{Classification, MatchClassifier, RankPolicy, RankReason, Rankability};
pub use error::{Error, Result};
pub use index::{PageIndexer, TotalMatches, PAGE_SIZE};
pub use model::{Match, MatchType, RawMatch, MATCH_STATE_COMPLETE};
pub use source::{MatchSource, Page};
pub use state::SyncState;
pub use store::{MatchStore, PutSummary, WritePolicy};
pub use sync::{
    reconcile_cutoff, CursorSink, SyncCoordinator, SyncOptions, SyncPhase, SyncPlan, SyncReport,
};
