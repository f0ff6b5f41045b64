//! Local-calendar derivation for a fixed UTC offset
//!
//! All day boundaries and hour-of-day figures use one configured fixed
//! offset (the platform serves one national audience). UTC must never
//! leak into day grouping: an evening event in São Paulo belongs to the
//! local day, not the following UTC day.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};

/// Build the fixed offset from whole hours east of UTC (São Paulo: -3).
///
/// Out-of-range values clamp to UTC rather than panicking; the config
/// default is always valid.
pub fn fixed_offset(utc_offset_hours: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_hours * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
}

/// Local calendar date of an instant.
pub fn local_date(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

/// Local hour of day (0-23) of an instant.
pub fn local_hour(ts: DateTime<Utc>, offset: FixedOffset) -> u8 {
    ts.with_timezone(&offset).hour() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_evening_event_stays_on_local_day() {
        let offset = fixed_offset(-3);
        // 01:30 UTC on Jan 2 is 22:30 on Jan 1 in São Paulo
        let instant = ts("2025-01-02T01:30:00Z");
        assert_eq!(
            local_date(instant, offset),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(local_hour(instant, offset), 22);
    }

    #[test]
    fn test_offset_clamps_out_of_range() {
        let offset = fixed_offset(999);
        assert_eq!(offset.local_minus_utc(), 0);
    }
}
