// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ms-core operations.

use thiserror::Error;

/// All possible errors that can occur in ms-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}\n  hint: the run was aborted and can be retried safely")]
    Network(String),

    #[error("remote returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("missing or invalid X-Total header: {0}")]
    MissingTotal(String),

    #[error("malformed page at offset {offset}: {reason}")]
    MalformedPage { offset: u64, reason: String },

    #[error("invalid page at offset {offset}: {reason}")]
    InvalidPage { offset: u64, reason: String },

    #[error("invalid match record: {0}")]
    InvalidMatch(String),

    #[error("invalid rank policy: '{0}'\n  hint: valid policies are: duration-gated, queue-type")]
    InvalidRankPolicy(String),

    #[error("invalid write policy: '{0}'\n  hint: valid policies are: upsert, insert-only")]
    InvalidWritePolicy(String),

    #[error("reconciliation window of {0} reaches before the earliest representable time\n  hint: lower reconcileWindowHours")]
    WindowOutOfRange(String),

    #[error("match not found: {0}")]
    MatchNotFound(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("cursor commit failed: {0}")]
    Cursor(String),
}

impl Error {
    /// Whether re-running the same operation may succeed.
    ///
    /// Network failures and non-success responses are transient; the core
    /// never retries them itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_) | Error::HttpStatus { .. })
    }
}

/// A specialized Result type for ms-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
