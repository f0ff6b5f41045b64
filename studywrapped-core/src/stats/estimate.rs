//! Study-time estimation from raw event timestamps
//!
//! Elapsed active time is inferred from the gaps between consecutive
//! events within one local calendar day, with each gap clamped to a
//! per-activity cap (60 s for flashcard reviews, 300 s for questions).
//! The cap is a deliberate undercount-biased heuristic: a long idle gap
//! means the student walked away, not that they studied for an hour.
//! Video time is never estimated this way - the player self-reports
//! already-accumulated watch seconds.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::collections::BTreeMap;

use super::zone;

/// Estimated active seconds for one day's sorted timestamps.
///
/// Gaps are clamped to `[0, cap]` and summed. Fewer than two events
/// yield 0: a single interaction cannot imply elapsed duration.
pub fn capped_day_seconds(times: &[DateTime<Utc>], cap: i64) -> i64 {
    if times.len() < 2 {
        return 0;
    }

    times
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds().clamp(0, cap))
        .sum()
}

/// Group event timestamps by local calendar day.
///
/// Input need not be sorted; each day's list comes out sorted.
pub fn group_by_local_day(
    times: &[DateTime<Utc>],
    offset: FixedOffset,
) -> BTreeMap<NaiveDate, Vec<DateTime<Utc>>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<DateTime<Utc>>> = BTreeMap::new();
    for &ts in times {
        by_day.entry(zone::local_date(ts, offset)).or_default().push(ts);
    }
    for day_times in by_day.values_mut() {
        day_times.sort();
    }
    by_day
}

/// Per-day active-time estimates for one activity type.
///
/// Returns (local day, estimated seconds) pairs in chronological order;
/// days whose estimate is 0 are still included so callers can merge
/// them into the daily breakdown.
pub fn daily_estimates(
    times: &[DateTime<Utc>],
    cap: i64,
    offset: FixedOffset,
) -> Vec<(NaiveDate, i64)> {
    group_by_local_day(times, offset)
        .into_iter()
        .map(|(day, day_times)| (day, capped_day_seconds(&day_times, cap)))
        .collect()
}

/// Total estimated active seconds across the whole window.
pub fn total_estimate(times: &[DateTime<Utc>], cap: i64, offset: FixedOffset) -> i64 {
    daily_estimates(times, cap, offset)
        .iter()
        .map(|(_, secs)| secs)
        .sum()
}

/// Flat fallback estimate when only a total count is known.
///
/// Used for questions when the remote API exposes counts but no
/// per-event timestamps.
pub fn flat_estimate(event_count: i64, seconds_per_event: i64) -> i64 {
    event_count.max(0) * seconds_per_event
}
