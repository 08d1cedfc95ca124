// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed local match store.
//!
//! Matches are keyed by `match_id`. Writing the same match twice never
//! creates a second row, so a sync run can always be repeated. Under
//! [`WritePolicy::Upsert`] a re-observed match overwrites its stored state
//! and payload (last observation wins) but keeps the `match_index` it was
//! first stored with.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::classify::{Classification, RankReason, Rankability};
use crate::error::{Error, Result};
use crate::model::{Match, MatchType, MATCH_STATE_COMPLETE};

/// SQL schema for the match store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS matches (
    match_id TEXT PRIMARY KEY,
    match_type TEXT NOT NULL,
    created_at TEXT NOT NULL,           -- RFC3339 UTC, fixed nanosecond width
    match_state INTEGER NOT NULL,
    duration_secs INTEGER,
    match_index INTEGER NOT NULL,       -- set on first insert only
    rankable INTEGER NOT NULL,
    rank_reason TEXT NOT NULL,          -- JSON-encoded RankReason
    payload TEXT NOT NULL               -- original remote record
);

CREATE INDEX IF NOT EXISTS idx_matches_index ON matches(match_index);
CREATE INDEX IF NOT EXISTS idx_matches_state_created ON matches(match_state, created_at);
CREATE INDEX IF NOT EXISTS idx_matches_created ON matches(created_at);
"#;

const MATCH_COLUMNS: &str = "match_id, match_type, created_at, match_state, duration_secs,
     match_index, rankable, rank_reason, payload";

/// How `put_batch` treats a match that is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Overwrite state, payload and classification; keep `match_index`.
    #[default]
    Upsert,
    /// Leave stored rows untouched.
    InsertOnly,
}

impl WritePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WritePolicy::Upsert => "upsert",
            WritePolicy::InsertOnly => "insert-only",
        }
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WritePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "upsert" => Ok(WritePolicy::Upsert),
            "insert-only" => Ok(WritePolicy::InsertOnly),
            _ => Err(Error::InvalidWritePolicy(s.to_string())),
        }
    }
}

/// Outcome of one `put_batch` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PutSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl PutSummary {
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Storage form of a timestamp. Fixed width, so text order is time order.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn conversion_error(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(Error::CorruptedData(message)),
    )
}

fn parse_stored_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(format!("invalid timestamp '{value}' in column 'created_at'")))
}

fn row_to_match(row: &Row<'_>) -> std::result::Result<Match, rusqlite::Error> {
    let type_str: String = row.get(1)?;
    let created_str: String = row.get(2)?;
    let index: i64 = row.get(5)?;
    let rankable: bool = row.get(6)?;
    let reason_str: String = row.get(7)?;
    let payload_str: String = row.get(8)?;

    let reason: RankReason = serde_json::from_str(&reason_str)
        .map_err(|_| conversion_error(format!("invalid rank reason '{reason_str}'")))?;
    let payload = serde_json::from_str(&payload_str)
        .map_err(|e| conversion_error(format!("invalid payload: {e}")))?;
    let match_index =
        u64::try_from(index).map_err(|_| conversion_error(format!("negative match_index {index}")))?;

    Ok(Match {
        match_id: row.get(0)?,
        match_type: MatchType::from(type_str),
        created_date: parse_stored_timestamp(&created_str)?,
        match_state: row.get(3)?,
        duration_secs: row.get(4)?,
        match_index,
        classification: Classification {
            rankability: if rankable {
                Rankability::Rankable
            } else {
                Rankability::NotRankable
            },
            reason,
        },
        payload,
    })
}

/// Local persistent store of matches.
pub struct MatchStore {
    /// The underlying SQLite connection.
    conn: Connection,
    policy: WritePolicy,
}

impl MatchStore {
    /// Open the store at the given path, creating it if needed.
    pub fn open(path: &Path, policy: WritePolicy) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(MatchStore { conn, policy })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory(policy: WritePolicy) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(MatchStore { conn, policy })
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    /// Check if a match is stored.
    pub fn contains(&self, match_id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM matches WHERE match_id = ?1",
            params![match_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get a stored match by id.
    pub fn get(&self, match_id: &str) -> Result<Match> {
        let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE match_id = ?1");
        self.conn
            .query_row(&sql, params![match_id], row_to_match)
            .optional()?
            .ok_or_else(|| Error::MatchNotFound(match_id.to_string()))
    }

    /// Total number of stored matches.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Write a batch of matches in one transaction.
    ///
    /// New ids are inserted with their `match_index`. Known ids are skipped
    /// or updated according to the store's [`WritePolicy`]; neither case is
    /// an error.
    pub fn put_batch(&mut self, matches: &[Match]) -> Result<PutSummary> {
        let policy = self.policy();
        let tx = self.conn.transaction()?;
        let mut summary = PutSummary::default();

        for m in matches {
            let payload = serde_json::to_string(&m.payload)?;
            let reason = serde_json::to_string(&m.classification.reason)?;
            let created = format_timestamp(&m.created_date);
            let index = m.match_index as i64;

            let existing: Option<(i64, String)> = tx
                .query_row(
                    "SELECT match_state, payload FROM matches WHERE match_id = ?1",
                    params![m.match_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            match existing {
                None => {
                    tx.execute(
                        "INSERT INTO matches (match_id, match_type, created_at, match_state,
                         duration_secs, match_index, rankable, rank_reason, payload)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                        params![
                            m.match_id,
                            m.match_type.as_str(),
                            created,
                            m.match_state,
                            m.duration_secs,
                            index,
                            m.is_rankable(),
                            reason,
                            payload,
                        ],
                    )?;
                    summary.inserted += 1;
                }
                Some((state, stored_payload))
                    if policy == WritePolicy::Upsert
                        && (state != m.match_state || stored_payload != payload) =>
                {
                    tx.execute(
                        "UPDATE matches SET match_type = ?1, created_at = ?2, match_state = ?3,
                         duration_secs = ?4, rankable = ?5, rank_reason = ?6, payload = ?7
                         WHERE match_id = ?8",
                        params![
                            m.match_type.as_str(),
                            created,
                            m.match_state,
                            m.duration_secs,
                            m.is_rankable(),
                            reason,
                            payload,
                            m.match_id,
                        ],
                    )?;
                    tracing::debug!(match_id = %m.match_id, from = state, to = m.match_state, "updated match");
                    summary.updated += 1;
                }
                Some(_) => summary.unchanged += 1,
            }
        }

        tx.commit()?;
        Ok(summary)
    }

    /// Lowest `match_index` with no stored match.
    ///
    /// Equals `count()` when the stored indices are contiguous from 0.
    pub fn first_missing_index(&self) -> Result<u64> {
        let index: i64 = self.conn.query_row(
            "SELECT CASE
                 WHEN NOT EXISTS (SELECT 1 FROM matches WHERE match_index = 0) THEN 0
                 ELSE (SELECT MIN(m.match_index) + 1 FROM matches m
                       WHERE NOT EXISTS (
                           SELECT 1 FROM matches n WHERE n.match_index = m.match_index + 1))
             END",
            [],
            |row| row.get(0),
        )?;
        Ok(index.max(0) as u64)
    }

    /// Incomplete matches created after `cutoff`, ascending by `match_index`.
    pub fn find_incomplete_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Match>> {
        let sql = format!(
            "SELECT {MATCH_COLUMNS} FROM matches
             WHERE match_state != ?1 AND created_at > ?2
             ORDER BY match_index ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let matches = stmt
            .query_map(
                params![MATCH_STATE_COMPLETE, format_timestamp(&cutoff)],
                row_to_match,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(matches)
    }

    /// Creation time of the most recently created stored match.
    ///
    /// Returns `None` when the store is empty.
    pub fn latest_known_time(&self) -> Result<Option<DateTime<Utc>>> {
        let latest: Option<String> =
            self.conn
                .query_row("SELECT MAX(created_at) FROM matches", [], |row| row.get(0))?;
        latest
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| Error::CorruptedData(format!("invalid timestamp '{s}'")))
            })
            .transpose()
    }

    /// Number of stored matches not yet in the complete state.
    pub fn count_incomplete(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM matches WHERE match_state != ?1",
            params![MATCH_STATE_COMPLETE],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    pub fn count_rankable(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM matches WHERE rankable = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Rankable matches, oldest first.
    pub fn rankable_matches(&self, limit: Option<usize>) -> Result<Vec<Match>> {
        let sql = format!(
            "SELECT {MATCH_COLUMNS} FROM matches
             WHERE rankable = 1
             ORDER BY match_index ASC
             LIMIT ?1"
        );
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(&sql)?;
        let matches = stmt
            .query_map(params![limit], row_to_match)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(matches)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
