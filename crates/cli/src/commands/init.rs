// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ms_core::{MatchStore, RankPolicy};

use crate::config::{Config, ConfigFile};
use crate::error::{Error, Result};

pub fn run(
    config_path: &Path,
    base_url: String,
    db: String,
    force: bool,
    rank_policy: Option<RankPolicy>,
) -> Result<()> {
    let file = run_impl(config_path, base_url, db, force, rank_policy)?;

    println!("Initialized matchsync config at {}", file.path.display());
    println!("Store: {}", file.db_path().display());
    println!("Rank policy: {}", file.config.rank_policy);
    Ok(())
}

/// Write a fresh config with a zero cursor and create its (empty) store.
///
/// An existing store is left as is; only the cursor is reset.
pub(crate) fn run_impl(
    config_path: &Path,
    base_url: String,
    db: String,
    force: bool,
    rank_policy: Option<RankPolicy>,
) -> Result<ConfigFile> {
    if config_path.exists() && !force {
        return Err(Error::AlreadyInitialized(config_path.display().to_string()));
    }

    let mut config = Config::new(base_url, db)?;
    if let Some(policy) = rank_policy {
        config.rank_policy = policy;
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = ConfigFile {
        path: config_path.to_path_buf(),
        config,
    };
    file.save()?;
    MatchStore::open(&file.db_path(), file.config.write_policy)?;

    tracing::info!(config = %file.path.display(), store = %file.db_path().display(), "initialized");
    Ok(file)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
