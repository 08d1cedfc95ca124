// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Match records as served by the remote API and as kept in the local store.
//!
//! A [`RawMatch`] is one parsed element of a remote page. It becomes a
//! [`Match`] once it has an absolute index and a classification attached.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::classify::Classification;
use crate::error::{Error, Result};

/// `matchStateId` value of a finished match. Every other value is transient.
pub const MATCH_STATE_COMPLETE: i64 = 6;

/// Queue type of a match (`dataString.type`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchType {
    /// Ranked 1v1 queue.
    Ranked1v1,
    /// Unranked 1v1 queue.
    Unranked1v1,
    /// Any other lobby or custom game type, kept verbatim.
    Other(String),
}

impl MatchType {
    pub fn as_str(&self) -> &str {
        match self {
            MatchType::Ranked1v1 => "1v1Ranked",
            MatchType::Unranked1v1 => "1v1Unranked",
            MatchType::Other(s) => s,
        }
    }

    /// Returns true for the matchmaking queues (ranked or unranked).
    pub fn is_queued(&self) -> bool {
        matches!(self, MatchType::Ranked1v1 | MatchType::Unranked1v1)
    }
}

impl From<&str> for MatchType {
    fn from(s: &str) -> Self {
        match s {
            "1v1Ranked" => MatchType::Ranked1v1,
            "1v1Unranked" => MatchType::Unranked1v1,
            other => MatchType::Other(other.to_string()),
        }
    }
}

impl From<String> for MatchType {
    fn from(s: String) -> Self {
        MatchType::from(s.as_str())
    }
}

impl From<MatchType> for String {
    fn from(t: MatchType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMatch {
    match_id: String,
    data_string: WireDataString,
    create_date: String,
    match_state_id: WireStateCode,
    #[serde(default)]
    data_integer: Option<WireDataInteger>,
}

#[derive(Deserialize)]
struct WireDataString {
    #[serde(rename = "type")]
    match_type: String,
}

#[derive(Deserialize)]
struct WireDataInteger {
    #[serde(default)]
    duration: Option<i64>,
}

/// `matchStateId` arrives string-encoded, but bare integers are accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireStateCode {
    Int(i64),
    Str(String),
}

impl WireStateCode {
    fn value(&self) -> Result<i64> {
        match self {
            WireStateCode::Int(v) => Ok(*v),
            WireStateCode::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::InvalidMatch(format!("invalid matchStateId '{s}'"))),
        }
    }
}

/// Parse an ISO-8601 timestamp, treating zone-less values as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::InvalidMatch(format!("invalid createDate '{value}'")))
}

/// One match record parsed from a remote page.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    pub match_id: String,
    pub match_type: MatchType,
    pub created_date: DateTime<Utc>,
    pub match_state: i64,
    /// Match length in seconds; absent while a match is still running.
    pub duration_secs: Option<i64>,
    /// The full original JSON object.
    pub payload: Value,
}

impl RawMatch {
    /// Parse one element of a page payload.
    pub fn from_value(value: Value) -> Result<Self> {
        let wire: WireMatch = serde_json::from_value(value.clone())
            .map_err(|e| Error::InvalidMatch(e.to_string()))?;
        if wire.match_id.is_empty() {
            return Err(Error::InvalidMatch("empty matchId".to_string()));
        }

        Ok(RawMatch {
            match_state: wire.match_state_id.value()?,
            created_date: parse_timestamp(&wire.create_date)?,
            match_type: MatchType::from(wire.data_string.match_type),
            duration_secs: wire.data_integer.and_then(|d| d.duration),
            match_id: wire.match_id,
            payload: value,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.match_state == MATCH_STATE_COMPLETE
    }
}

/// A stored match: the raw record plus its absolute index and classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub match_id: String,
    pub match_type: MatchType,
    pub created_date: DateTime<Utc>,
    pub match_state: i64,
    pub duration_secs: Option<i64>,
    /// Position in creation order, oldest match = 0.
    pub match_index: u64,
    pub classification: Classification,
    #[serde(skip)]
    pub payload: Value,
}

impl Match {
    pub fn from_raw(raw: RawMatch, match_index: u64, classification: Classification) -> Self {
        Match {
            match_id: raw.match_id,
            match_type: raw.match_type,
            created_date: raw.created_date,
            match_state: raw.match_state,
            duration_secs: raw.duration_secs,
            match_index,
            classification,
            payload: raw.payload,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.match_state == MATCH_STATE_COMPLETE
    }

    pub fn is_rankable(&self) -> bool {
        self.classification.is_rankable()
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
