// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rankability classification.
//!
//! Two policies exist and neither is the obvious default, so the choice is
//! an explicit setting:
//!
//! - [`RankPolicy::DurationGated`]: only ranked 1v1 matches lasting longer
//!   than a minimum duration (120 seconds by default) are rankable. Short
//!   matches are usually disconnects or instant surrenders.
//! - [`RankPolicy::QueueType`]: any ranked or unranked 1v1 queue match is
//!   rankable. Queue matches are the only ones that guarantee no AI players
//!   and no resource handicaps; duration is ignored.
//!
//! Classification is a pure function of the match's own fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::{MatchType, RawMatch};

/// Default minimum duration for [`RankPolicy::DurationGated`].
pub const DEFAULT_MIN_DURATION_SECS: i64 = 120;

/// Which matches count as rankable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankPolicy {
    /// Ranked 1v1 queue and duration above the minimum.
    #[default]
    DurationGated,
    /// Ranked or unranked 1v1 queue, any duration.
    QueueType,
}

impl RankPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankPolicy::DurationGated => "duration-gated",
            RankPolicy::QueueType => "queue-type",
        }
    }
}

impl fmt::Display for RankPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RankPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "duration-gated" => Ok(RankPolicy::DurationGated),
            "queue-type" => Ok(RankPolicy::QueueType),
            _ => Err(Error::InvalidRankPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rankability {
    Rankable,
    NotRankable,
}

/// Why a match was (or was not) classified as rankable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RankReason {
    /// Ranked queue match that ran long enough.
    RankedQueue,
    /// Ranked or unranked queue match (queue-type policy).
    QueuedMatch,
    TooShort { duration_secs: i64, min_secs: i64 },
    /// No duration reported, typically a match still in progress.
    MissingDuration,
    NotQueued { match_type: String },
}

impl fmt::Display for RankReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankReason::RankedQueue => write!(f, "ranked queue"),
            RankReason::QueuedMatch => write!(f, "queue match"),
            RankReason::TooShort {
                duration_secs,
                min_secs,
            } => write!(f, "too short ({duration_secs}s, need more than {min_secs}s)"),
            RankReason::MissingDuration => write!(f, "no duration reported"),
            RankReason::NotQueued { match_type } => write!(f, "not a queue match ({match_type})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub rankability: Rankability,
    #[serde(flatten)]
    pub reason: RankReason,
}

impl Classification {
    fn rankable(reason: RankReason) -> Self {
        Classification {
            rankability: Rankability::Rankable,
            reason,
        }
    }

    fn not_rankable(reason: RankReason) -> Self {
        Classification {
            rankability: Rankability::NotRankable,
            reason,
        }
    }

    pub fn is_rankable(&self) -> bool {
        self.rankability == Rankability::Rankable
    }
}

/// Classifies matches under one [`RankPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchClassifier {
    policy: RankPolicy,
    min_duration_secs: i64,
}

impl Default for MatchClassifier {
    fn default() -> Self {
        MatchClassifier::new(RankPolicy::default(), DEFAULT_MIN_DURATION_SECS)
    }
}

impl MatchClassifier {
    pub fn new(policy: RankPolicy, min_duration_secs: i64) -> Self {
        MatchClassifier {
            policy,
            min_duration_secs,
        }
    }

    pub fn policy(&self) -> RankPolicy {
        self.policy
    }

    pub fn classify(&self, raw: &RawMatch) -> Classification {
        self.classify_fields(&raw.match_type, raw.duration_secs)
    }

    pub fn classify_fields(
        &self,
        match_type: &MatchType,
        duration_secs: Option<i64>,
    ) -> Classification {
        match self.policy {
            RankPolicy::QueueType => {
                if match_type.is_queued() {
                    Classification::rankable(RankReason::QueuedMatch)
                } else {
                    Classification::not_rankable(RankReason::NotQueued {
                        match_type: match_type.to_string(),
                    })
                }
            }
            RankPolicy::DurationGated => {
                if *match_type != MatchType::Ranked1v1 {
                    return Classification::not_rankable(RankReason::NotQueued {
                        match_type: match_type.to_string(),
                    });
                }
                match duration_secs {
                    None => Classification::not_rankable(RankReason::MissingDuration),
                    Some(d) if d > self.min_duration_secs => {
                        Classification::rankable(RankReason::RankedQueue)
                    }
                    Some(d) => Classification::not_rankable(RankReason::TooShort {
                        duration_secs: d,
                        min_secs: self.min_duration_secs,
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
