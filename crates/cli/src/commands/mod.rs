// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod incomplete;
pub mod init;
pub mod rankable;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use serde::Serialize;

use ms_core::MatchStore;

use crate::config::ConfigFile;
use crate::error::Result;

/// Open the store named by a loaded config.
pub fn open_store(file: &ConfigFile) -> Result<MatchStore> {
    let db_path = file.db_path();
    tracing::debug!(path = %db_path.display(), "opening store");
    Ok(MatchStore::open(&db_path, file.config.write_policy)?)
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
