// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Absolute match indexing.
//!
//! The remote API pages backwards from the most recent match: offset 0 is
//! the newest page and records inside a page are newest-first. Stored
//! matches instead need a stable ascending position, where index 0 is the
//! oldest match ever played.
//!
//! For a total `T`, page size `P`, and a page at offset `O` holding `c`
//! records, the record at position `i` (0 = newest in the page) gets
//!
//! ```text
//! page_start = max(T - (O + P), 0)
//! index(i)   = page_start + (c - i - 1)
//! ```
//!
//! All pages of one run must share the same `T`. The remote count keeps
//! growing while a run is in flight, so the total is captured once as a
//! [`TotalMatches`] and handed to every [`PageIndexer`] call.

use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};

/// Maximum number of records the remote API returns per page.
pub const PAGE_SIZE: u64 = 50;

/// Snapshot of the remote match count, taken once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TotalMatches(u64);

impl TotalMatches {
    pub fn new(total: u64) -> Self {
        TotalMatches(total)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TotalMatches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of pages needed to cover `matches` records.
pub fn pages_to_cover(matches: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    matches.div_ceil(page_size)
}

/// Maps (offset, position-in-page) pairs to absolute indices for one run.
#[derive(Debug, Clone, Copy)]
pub struct PageIndexer {
    total: TotalMatches,
    page_size: u64,
}

impl PageIndexer {
    pub fn new(total: TotalMatches, page_size: u64) -> Self {
        PageIndexer { total, page_size }
    }

    pub fn total(&self) -> TotalMatches {
        self.total
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Index of the oldest match a full page at `offset` would contain.
    pub fn page_start_index(&self, offset: u64) -> u64 {
        self.total
            .get()
            .saturating_sub(offset.saturating_add(self.page_size))
    }

    /// Absolute index of the `position`-th record of a page holding
    /// `record_count` records.
    pub fn absolute_index(&self, offset: u64, record_count: usize, position: usize) -> Result<u64> {
        let count = record_count as u64;
        if count > self.page_size {
            return Err(Error::InvalidPage {
                offset,
                reason: format!(
                    "{record_count} records exceeds page size {}",
                    self.page_size
                ),
            });
        }
        if position >= record_count {
            return Err(Error::InvalidPage {
                offset,
                reason: format!("position {position} out of range for {record_count} records"),
            });
        }
        Ok(self.page_start_index(offset) + (count - position as u64 - 1))
    }

    /// Indices for every record of a page, in page order (newest first).
    pub fn page_indices(&self, offset: u64, record_count: usize) -> Result<Vec<u64>> {
        (0..record_count)
            .map(|position| self.absolute_index(offset, record_count, position))
            .collect()
    }

    /// Number of most-recent matches to fetch so that `index` is covered.
    ///
    /// Returns 0 when `index` lies beyond the snapshot.
    pub fn distance_to_present(&self, index: u64) -> u64 {
        self.total.get().saturating_sub(index)
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
