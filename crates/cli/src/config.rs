// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file management.
//!
//! The config file holds the sync cursor (`baseUrl`, `nextRecordIndex`,
//! `localDbName`) and optional tuning keys. It is JSON unless the file name
//! ends in `.toml`. Saving always rewrites the whole file through a
//! temporary sibling and a rename, so a crash never leaves half a config.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ms_core::classify::DEFAULT_MIN_DURATION_SECS;
use ms_core::sync::{DEFAULT_MAX_MATCHES_PER_RUN, DEFAULT_RECONCILE_WINDOW_HOURS};
use ms_core::{CursorSink, MatchClassifier, RankPolicy, SyncOptions, SyncState, WritePolicy};

use crate::error::{Error, Result};

/// Config file looked up in the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "matchsync.json";

const DB_EXTENSION: &str = "db";
const LOCK_EXTENSION: &str = "lock";

/// On-disk encoding of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Contents of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Remote match history endpoint.
    pub base_url: String,
    /// Stored match count after the last successful sync.
    pub next_record_index: u64,
    /// Local store name; resolved relative to the config file.
    pub local_db_name: String,
    #[serde(default)]
    pub rank_policy: RankPolicy,
    /// Minimum duration for the duration-gated policy (seconds).
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: i64,
    /// Per-run fetch cap. 0 = unlimited.
    #[serde(default = "default_max_matches_per_run")]
    pub max_matches_per_run: u64,
    /// Look-back before the newest stored match when hunting incomplete matches.
    #[serde(default = "default_reconcile_window_hours")]
    pub reconcile_window_hours: i64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub write_policy: WritePolicy,
}

fn default_min_duration_secs() -> i64 {
    DEFAULT_MIN_DURATION_SECS
}

fn default_max_matches_per_run() -> u64 {
    DEFAULT_MAX_MATCHES_PER_RUN
}

fn default_reconcile_window_hours() -> i64 {
    DEFAULT_RECONCILE_WINDOW_HOURS
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Creates a config with a zero cursor and default tuning.
    pub fn new(base_url: String, local_db_name: String) -> Result<Self> {
        let config = Config {
            base_url,
            next_record_index: 0,
            local_db_name,
            rank_policy: RankPolicy::default(),
            min_duration_secs: default_min_duration_secs(),
            max_matches_per_run: default_max_matches_per_run(),
            reconcile_window_hours: default_reconcile_window_hours(),
            request_timeout_secs: default_request_timeout_secs(),
            write_policy: WritePolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialization alone cannot.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "invalid baseUrl '{}': must start with http:// or https://",
                self.base_url
            )));
        }
        if self.local_db_name.trim().is_empty() {
            return Err(Error::Config("localDbName cannot be empty".to_string()));
        }
        if self.min_duration_secs < 0 {
            return Err(Error::Config("minDurationSecs cannot be negative".to_string()));
        }
        self.reconcile_window()?;
        Ok(())
    }

    /// The reconciliation window as a duration.
    pub fn reconcile_window(&self) -> Result<Duration> {
        if self.reconcile_window_hours < 0 {
            return Err(Error::Config(
                "reconcileWindowHours cannot be negative".to_string(),
            ));
        }
        Duration::try_hours(self.reconcile_window_hours).ok_or_else(|| {
            Error::Config(format!(
                "reconcileWindowHours {} is out of range",
                self.reconcile_window_hours
            ))
        })
    }

    /// Parses config text in the given format and validates it.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: Config = match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?,
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn render(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::Config(format!("failed to serialize config: {}", e))),
        }
    }

    /// Loads configuration from `path`. A missing file is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::not_initialized(path));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    /// Saves configuration to `path`, replacing the previous file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.render(ConfigFormat::from_path(path))?;
        write_atomic(path, content.as_bytes())
    }

    /// The cursor part of the config.
    pub fn sync_state(&self) -> SyncState {
        SyncState {
            base_url: self.base_url.clone(),
            next_record_index: self.next_record_index,
            store_identifier: self.local_db_name.clone(),
        }
    }

    pub fn apply_state(&mut self, state: &SyncState) {
        self.base_url = state.base_url.clone();
        self.next_record_index = state.next_record_index;
        self.local_db_name = state.store_identifier.clone();
    }

    pub fn sync_options(&self) -> Result<SyncOptions> {
        Ok(SyncOptions {
            max_matches_per_run: (self.max_matches_per_run > 0).then_some(self.max_matches_per_run),
            reconcile_window: self.reconcile_window()?,
            classifier: MatchClassifier::new(self.rank_policy, self.min_duration_secs),
        })
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// Path of the SQLite store for a config located at `config_path`.
    ///
    /// A bare name becomes `<name>.db` next to the config file. Names with an
    /// extension or absolute paths are used as given.
    pub fn db_path(&self, config_path: &Path) -> PathBuf {
        let name = Path::new(&self.local_db_name);
        if name.is_absolute() {
            return name.to_path_buf();
        }
        let base = config_path.parent().unwrap_or_else(|| Path::new(""));
        if name.extension().is_some() {
            base.join(name)
        } else {
            base.join(name).with_extension(DB_EXTENSION)
        }
    }
}

/// Lock file guarding sync runs against the store at `db_path`.
pub fn lock_path(db_path: &Path) -> PathBuf {
    let mut name = db_path.as_os_str().to_os_string();
    name.push(".");
    name.push(LOCK_EXTENSION);
    PathBuf::from(name)
}

/// Write `data` to `path` via a temporary sibling, fsync, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Config(format!("invalid config path {}", path.display())))?;
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

/// A loaded config bound to its file; the durable home of the sync cursor.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub config: Config,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigFile {
            path: path.to_path_buf(),
            config: Config::load(path)?,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.config.db_path(&self.path)
    }

    pub fn save(&self) -> Result<()> {
        self.config.save(&self.path)
    }
}

impl CursorSink for ConfigFile {
    fn commit(&mut self, state: &SyncState) -> ms_core::Result<()> {
        let mut next = self.config.clone();
        next.apply_state(state);
        next.save(&self.path)
            .map_err(|e| ms_core::Error::Cursor(e.to_string()))?;
        self.config = next;
        tracing::debug!(cursor = state.next_record_index, path = %self.path.display(), "committed cursor");
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
