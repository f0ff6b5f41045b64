//! Temporal metrics over per-day activity records
//!
//! Everything here is a pure function over [`DayActivity`] rows. Input
//! order is never assumed: functions that need chronology sort
//! internally. All dates are local calendar days in the configured
//! zone; see [`super::zone`] for the UTC-to-local derivation.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::types::{BestMonth, DailyRecord, format_day};

/// One day of activity as consumed by the temporal calculator.
///
/// `count` and `total` mirror the two field names observed upstream for
/// the same figure; [`DayActivity::activity`] applies the agreed
/// `count ?? total ?? 0` fallback chain.
#[derive(Debug, Clone, Copy)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub count: Option<i64>,
    pub total: Option<i64>,
}

impl DayActivity {
    pub fn new(date: NaiveDate, count: i64) -> Self {
        Self {
            date,
            count: Some(count),
            total: None,
        }
    }

    /// Activity count with the `count ?? total ?? 0` fallback.
    pub fn activity(&self) -> i64 {
        self.count.or(self.total).unwrap_or(0)
    }

    fn is_active(&self) -> bool {
        self.activity() > 0
    }
}

/// Count of days with strictly positive activity.
///
/// A day that was logged but carries zero activity is not a study day.
pub fn active_days(records: &[DayActivity]) -> i64 {
    records.iter().filter(|r| r.is_active()).count() as i64
}

/// Longest run of consecutive active days.
///
/// Active dates are sorted internally before the scan; a streak extends
/// only when consecutive active dates differ by exactly one calendar
/// day, and anything else (a gap, or a duplicate date) resets the run
/// to 1. Returns 0 for an empty active-day set so "no data" stays
/// distinguishable from "one active day".
pub fn longest_streak(records: &[DayActivity]) -> i64 {
    let mut dates: Vec<NaiveDate> = records
        .iter()
        .filter(|r| r.is_active())
        .map(|r| r.date)
        .collect();

    if dates.is_empty() {
        return 0;
    }

    dates.sort();

    let mut longest = 1i64;
    let mut current = 1i64;
    let mut prev = dates[0];

    for date in dates.into_iter().skip(1) {
        if (date - prev).num_days() == 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
        prev = date;
    }

    longest
}

/// The active day with the maximum count.
///
/// Single linear scan with strictly-greater replacement, so among tied
/// counts the earliest date encountered wins.
pub fn daily_record(records: &[DayActivity]) -> Option<DailyRecord> {
    let mut best: Option<(NaiveDate, i64)> = None;

    let mut sorted: Vec<&DayActivity> = records.iter().filter(|r| r.is_active()).collect();
    sorted.sort_by_key(|r| r.date);

    for rec in sorted {
        let count = rec.activity();
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((rec.date, count)),
        }
    }

    best.map(|(date, count)| DailyRecord {
        date: format_day(date),
        count,
    })
}

/// The calendar month with the highest summed activity.
///
/// Grouping is chronological, and replacement is strictly-greater, so
/// among tied months the earliest wins.
pub fn best_month(records: &[DayActivity]) -> Option<BestMonth> {
    let mut by_month: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for rec in records.iter().filter(|r| r.is_active()) {
        *by_month
            .entry((rec.date.year(), rec.date.month()))
            .or_insert(0) += rec.activity();
    }

    let mut best: Option<((i32, u32), i64)> = None;
    for (month, count) in by_month {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((month, count)),
        }
    }

    best.map(|((_, month), count)| BestMonth {
        name: month_name(month).to_string(),
        count,
    })
}

/// Hour of day (0-23) with the most events.
///
/// `hours` is one entry per event, already converted to the configured
/// zone. With no timestamped events available the configured default
/// hour is reported instead of failing.
pub fn peak_hour(hours: &[u8], default_hour: u8) -> u8 {
    if hours.is_empty() {
        return default_hour;
    }

    let mut distribution = [0i64; 24];
    for &hour in hours {
        if hour < 24 {
            distribution[hour as usize] += 1;
        }
    }

    distribution
        .iter()
        .enumerate()
        .max_by_key(|(_, &count)| count)
        .map(|(hour, _)| hour as u8)
        .unwrap_or(default_hour)
}

/// English month name from a 1-12 month number.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
