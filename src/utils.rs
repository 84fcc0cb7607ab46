//! Utility functions for the leaderboard pipeline

use chrono::{DateTime, SecondsFormat, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// `YYYY-MM` month key for a UTC timestamp
pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// ISO-8601 rendering used in the `updated_utc` report field
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Lowercase `region|realm|name` state key for a character
pub fn character_key(region: &str, realm: &str, name: &str) -> String {
    format!(
        "{}|{}|{}",
        region.to_lowercase(),
        realm.to_lowercase(),
        name.to_lowercase()
    )
}

/// Truncate a raw response body for inclusion in an error record
///
/// Counts characters, not bytes, so multi-byte bodies are never split
/// mid-codepoint.
pub fn truncate_sample(raw: &str, max_chars: usize) -> String {
    raw.chars().take(max_chars).collect()
}
