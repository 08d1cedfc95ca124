// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exclusive run lock so only one process syncs a given store at a time.

use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config::lock_path;
use crate::error::{Error, Result};

/// Held for the duration of a sync run. Released when dropped.
#[derive(Debug)]
pub struct RunLock {
    _file: fs::File,
    path: PathBuf,
}

impl RunLock {
    /// Take the lock for the store at `db_path`, failing if another process holds it.
    pub fn acquire(db_path: &Path) -> Result<Self> {
        let path = lock_path(db_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| Error::SyncLocked(db_path.display().to_string()))?;
        tracing::debug!(path = %path.display(), "acquired run lock");
        Ok(RunLock { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
