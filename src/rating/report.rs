//! Ranking and report assembly

use crate::types::{ErrorRecord, RatingReport, RatingRow};
use chrono::{DateTime, Utc};

/// Sort rows into leaderboard order
///
/// Descending by current-month kills, ties broken by descending total kills.
/// The sort is stable; order among exact ties is unspecified.
pub fn rank_rows(rows: &mut [RatingRow]) {
    rows.sort_by(|a, b| {
        b.honorable_kills_month
            .cmp(&a.honorable_kills_month)
            .then(b.honorable_kills_total.cmp(&a.honorable_kills_total))
    });
}

/// Assemble the final report for one run
pub fn build_report(
    month: String,
    now: DateTime<Utc>,
    mut rows: Vec<RatingRow>,
    errors: Vec<ErrorRecord>,
    count_all_chars: usize,
    max_level: u32,
) -> RatingReport {
    rank_rows(&mut rows);

    RatingReport {
        month,
        updated_utc: crate::utils::iso_timestamp(now),
        count: rows.len(),
        count_all_chars,
        max_level,
        rows,
        errors,
    }
}
