// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted sync cursor.

use serde::{Deserialize, Serialize};

/// Cursor carried from one sync run to the next.
///
/// Loaded once at startup and only replaced after a run has persisted its
/// matches. The field names match the config file keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    /// Endpoint of the remote match history.
    pub base_url: String,
    /// Number of matches stored locally after the last successful run.
    pub next_record_index: u64,
    /// Name of the local store.
    #[serde(rename = "localDbName")]
    pub store_identifier: String,
}

impl SyncState {
    pub fn new(base_url: impl Into<String>, store_identifier: impl Into<String>) -> Self {
        SyncState {
            base_url: base_url.into(),
            next_record_index: 0,
            store_identifier: store_identifier.into(),
        }
    }
}
