// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote match source abstraction.
//!
//! The [`MatchSource`] trait keeps the sync engine independent of the HTTP
//! client, so tests can drive it with scripted pages.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::index::{pages_to_cover, TotalMatches, PAGE_SIZE};
use crate::model::RawMatch;

/// One response page: up to `page_size` records, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Number of matches back from the most recent one.
    pub offset: u64,
    pub records: Vec<RawMatch>,
}

impl Page {
    pub fn new(offset: u64, records: Vec<RawMatch>) -> Self {
        Page { offset, records }
    }

    /// Parse a page body (a JSON array of match objects).
    ///
    /// Any unparsable element rejects the whole page.
    pub fn parse(offset: u64, body: &str) -> Result<Self> {
        let values: Vec<Value> =
            serde_json::from_str(body).map_err(|e| Error::MalformedPage {
                offset,
                reason: e.to_string(),
            })?;

        let records = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                RawMatch::from_value(value).map_err(|e| Error::MalformedPage {
                    offset,
                    reason: format!("record {i}: {e}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Page { offset, records })
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Read-only access to the remote match history.
///
/// Every method is safe to retry. Implementations do not retry on their own.
pub trait MatchSource {
    /// Total number of matches ever played.
    fn total_count(&self) -> Result<TotalMatches>;

    /// Fetch the page starting `offset` matches back from the most recent.
    fn fetch_page(&self, offset: u64) -> Result<Page>;

    fn page_size(&self) -> u64 {
        PAGE_SIZE
    }

    /// Fetch enough pages, newest first, to cover `matches` records.
    ///
    /// Stops early once a page comes back short, since that page holds the
    /// oldest matches.
    fn fetch_pages_covering(&self, matches: u64) -> Result<Vec<Page>> {
        let page_size = self.page_size();
        let page_count = pages_to_cover(matches, page_size);
        let mut pages = Vec::new();

        for page_number in 0..page_count {
            let offset = page_number * page_size;
            let page = self.fetch_page(offset)?;
            let short = (page.record_count() as u64) < page_size;
            tracing::debug!(offset, records = page.record_count(), "fetched page");
            pages.push(page);
            if short {
                tracing::debug!(offset, "short page, end of history");
                break;
            }
        }

        Ok(pages)
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
