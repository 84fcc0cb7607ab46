//! Counter-delta engine for the monthly rating
//!
//! Tracks a cumulative kill counter per character and derives calendar-month
//! deltas from it. The counter is monotonic in intent but may regress
//! externally (season reset), so the month floor is clamped downward and the
//! reported delta is never negative.

use crate::types::CharacterKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-character persisted state for the current scoring month
///
/// `month_start` is the counter value treated as the zero-point of the current
/// month; `last` always holds the most recent observed counter. Exactly one
/// prior month is retained in `prev_month` / `prev_month_kills`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMonthState {
    /// `YYYY-MM` month this entry is scoring
    pub month: String,
    pub month_start: u64,
    pub last: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_month_kills: Option<u64>,
}

impl CharacterMonthState {
    /// Open a fresh entry at the first observation of a character
    ///
    /// The first observation establishes the month floor; it does not itself
    /// score a delta.
    pub fn open(month: &str, counter: u64) -> Self {
        Self {
            month: month.to_string(),
            month_start: counter,
            last: counter,
            prev_month: None,
            prev_month_kills: None,
        }
    }

    /// Fold one counter reading into the state, returning the month delta
    ///
    /// Rollover is detected by comparing the stored month label against the
    /// current one, so runs skipped for whole months still archive correctly.
    pub fn observe(&mut self, month: &str, counter: u64) -> u64 {
        if self.month != month {
            let archived = self.last.saturating_sub(self.month_start);
            self.prev_month = Some(std::mem::replace(&mut self.month, month.to_string()));
            self.prev_month_kills = Some(archived);
            self.month_start = counter;
        }

        // Counter reset or decreased upstream: lower the floor so the
        // delta cannot go negative.
        if counter < self.month_start {
            self.month_start = counter;
        }

        let delta = counter - self.month_start;
        self.last = counter;
        delta
    }
}

/// Result of feeding one reading through the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthObservation {
    /// Kills scored in the current month so far
    pub month_delta: u64,
    /// Archived kills of the single retained prior month (0 if none)
    pub prev_month_kills: u64,
}

/// Persisted mapping from character key to per-month state
///
/// Entries are created on first successful observation and never deleted;
/// characters that stop reporting simply stop being updated. A `BTreeMap`
/// keeps the persisted artifact deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingState {
    entries: BTreeMap<CharacterKey, CharacterMonthState>,
}

impl RatingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CharacterMonthState> {
        self.entries.get(key)
    }

    /// Insert a prepared entry, replacing any existing one (tests, migration)
    pub fn insert(&mut self, key: CharacterKey, entry: CharacterMonthState) {
        self.entries.insert(key, entry);
    }

    /// Fold one reading for `key` into the state
    ///
    /// Creates the entry on first sight (delta 0), otherwise applies rollover
    /// detection, the regression clamp, and the delta computation.
    pub fn observe(&mut self, key: &str, month: &str, counter: u64) -> MonthObservation {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| CharacterMonthState::open(month, counter));

        let month_delta = entry.observe(month, counter);
        MonthObservation {
            month_delta,
            prev_month_kills: entry.prev_month_kills.unwrap_or(0),
        }
    }
}
