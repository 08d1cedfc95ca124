// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use thiserror::Error;

/// All possible errors that can occur in the matchsync library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: no config at {0}\n  hint: run 'matchsync init --base-url <url> --db <name>' first")]
    NotInitialized(String),

    #[error("already initialized at {0}\n  hint: pass --force to overwrite")]
    AlreadyInitialized(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("a sync is already running for {0}")]
    SyncLocked(String),

    #[error("{0}")]
    Core(#[from] ms_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn not_initialized(path: &Path) -> Self {
        Error::NotInitialized(path.display().to_string())
    }
}

/// A specialized Result type for matchsync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
