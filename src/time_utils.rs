// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar arithmetic and date formatting.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Week-of-year number as used by the training statistics.
///
/// Fractional days since 1 January (time of day included), shifted by
/// the weekday of 1 January (Sunday = 0) plus one, divided by seven and
/// rounded up.
pub fn week_number(at: NaiveDateTime) -> i64 {
    let jan_first = NaiveDate::from_ymd_opt(at.year(), 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(at);
    let offset = jan_first.weekday().num_days_from_sunday() as f64;
    let days = (at - jan_first).num_milliseconds() as f64 / MILLIS_PER_DAY;
    ((days + offset + 1.0) / 7.0).ceil() as i64
}

/// Format a date as a history key (`YYYY-MM-DD`).
pub fn format_history_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
