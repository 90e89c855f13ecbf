// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rolling training statistics for users and groups.
//!
//! Distance and elevation gain are accumulated over the current week,
//! month and year. Only the current totals are stored; there is no
//! per-period history.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::time_utils::week_number;

/// Distance (km) and elevation gain (m) accumulated over one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PeriodTotals {
    #[serde(rename = "km")]
    #[validate(range(min = 0.0))]
    pub distance: f64,
    #[serde(rename = "desnivel")]
    #[validate(range(min = 0.0))]
    pub elevation: f64,
}

impl PeriodTotals {
    fn add(&mut self, distance: f64, elevation: f64) {
        self.distance += distance;
        self.elevation += elevation;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Week/month/year accumulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainingStats {
    #[serde(rename = "semana", default)]
    #[validate(nested)]
    week: PeriodTotals,
    #[serde(rename = "mes", default)]
    #[validate(nested)]
    month: PeriodTotals,
    #[serde(rename = "anio", default)]
    #[validate(nested)]
    year: PeriodTotals,
}

impl TrainingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a training session happening now (local time).
    pub fn record(&mut self, distance: f64, elevation: f64) {
        self.record_at(distance, elevation, Local::now().naive_local());
    }

    /// Record a training session at `now`.
    ///
    /// The values are added to every bucket first. A bucket is then zeroed
    /// when `now` falls in a different period than the reference point
    /// (seven days earlier for the week, one day earlier for month and
    /// year), which discards the contribution just added.
    pub fn record_at(&mut self, distance: f64, elevation: f64, now: NaiveDateTime) {
        let week = week_number(now);
        let month = now.month();
        let year = now.year();

        self.week.add(distance, elevation);
        self.month.add(distance, elevation);
        self.year.add(distance, elevation);

        if week != week_number(now - Duration::days(7)) + 1 {
            self.week.reset();
        }

        let yesterday = now - Duration::days(1);
        if month != yesterday.month() {
            self.month.reset();
        }
        if year != yesterday.year() {
            self.year.reset();
        }
    }

    /// Record a training session that took place on `date`.
    pub fn record_on(&mut self, distance: f64, elevation: f64, date: NaiveDate) {
        self.record_on_at(distance, elevation, date, Local::now().naive_local());
    }

    /// Record a session dated `date`, as seen at `now`.
    ///
    /// A session dated today goes through [`record_at`](Self::record_at).
    /// Any other date only adds to the buckets whose current period
    /// contains it, and never resets a bucket.
    pub fn record_on_at(&mut self, distance: f64, elevation: f64, date: NaiveDate, now: NaiveDateTime) {
        if date == now.date() {
            self.record_at(distance, elevation, now);
            return;
        }
        if date.year() != now.year() {
            return;
        }

        self.year.add(distance, elevation);
        if date.month() == now.month() {
            self.month.add(distance, elevation);
        }
        if week_number(date.and_time(now.time())) == week_number(now) {
            self.week.add(distance, elevation);
        }
    }

    pub fn weekly_totals(&self) -> PeriodTotals {
        self.week
    }

    pub fn monthly_totals(&self) -> PeriodTotals {
        self.month
    }

    pub fn yearly_totals(&self) -> PeriodTotals {
        self.year
    }

    /// Zero every accumulator.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn totals(distance: f64, elevation: f64) -> PeriodTotals {
        PeriodTotals {
            distance,
            elevation,
        }
    }

    #[test]
    fn test_record_single_session() {
        let mut stats = TrainingStats::new();
        stats.record_at(10.0, 100.0, at(2024, 3, 13));

        assert_eq!(stats.weekly_totals(), totals(10.0, 100.0));
        assert_eq!(stats.monthly_totals(), totals(10.0, 100.0));
        assert_eq!(stats.yearly_totals(), totals(10.0, 100.0));
    }

    #[test]
    fn test_record_accumulates_within_period() {
        let mut stats = TrainingStats::new();
        stats.record_at(10.0, 100.0, at(2024, 3, 13));
        stats.record_at(10.0, 100.0, at(2024, 3, 14));

        assert_eq!(stats.weekly_totals(), totals(20.0, 200.0));
        assert_eq!(stats.monthly_totals(), totals(20.0, 200.0));
        assert_eq!(stats.yearly_totals(), totals(20.0, 200.0));
    }

    #[test]
    fn test_first_day_of_month_discards_monthly_contribution() {
        let mut stats = TrainingStats::new();
        stats.record_at(5.0, 50.0, at(2024, 2, 28));
        stats.record_at(10.0, 100.0, at(2024, 3, 1));

        assert_eq!(stats.monthly_totals(), PeriodTotals::default());
        assert_eq!(stats.weekly_totals(), totals(15.0, 150.0));
        assert_eq!(stats.yearly_totals(), totals(15.0, 150.0));
    }

    #[test]
    fn test_new_year_resets_everything() {
        let mut stats = TrainingStats::new();
        stats.record_at(5.0, 50.0, at(2023, 12, 30));
        stats.record_at(10.0, 100.0, at(2024, 1, 1));

        assert_eq!(stats.weekly_totals(), PeriodTotals::default());
        assert_eq!(stats.monthly_totals(), PeriodTotals::default());
        assert_eq!(stats.yearly_totals(), PeriodTotals::default());
    }

    #[test]
    fn test_weekly_bucket_resets_during_first_week_of_year() {
        let mut stats = TrainingStats::new();
        stats.record_at(10.0, 100.0, at(2024, 1, 5));

        // One day earlier is still 2024, seven days earlier is not.
        assert_eq!(stats.weekly_totals(), PeriodTotals::default());
        assert_eq!(stats.monthly_totals(), totals(10.0, 100.0));
        assert_eq!(stats.yearly_totals(), totals(10.0, 100.0));
    }

    #[test]
    fn test_mid_year_week_change_keeps_weekly_totals() {
        let mut stats = TrainingStats::new();
        stats.record_at(10.0, 100.0, at(2024, 6, 8));
        stats.record_at(10.0, 100.0, at(2024, 6, 9));

        assert_eq!(stats.weekly_totals(), totals(20.0, 200.0));
    }

    #[test]
    fn test_backdated_session_skips_past_periods() {
        let mut stats = TrainingStats::new();
        stats.record_at(10.0, 100.0, at(2024, 6, 12));

        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        stats.record_on_at(10.0, 100.0, day(1999, 1, 1), at(2024, 6, 12));
        assert_eq!(stats.weekly_totals(), totals(10.0, 100.0));
        assert_eq!(stats.yearly_totals(), totals(10.0, 100.0));

        // Earlier this month but in a previous week
        stats.record_on_at(5.0, 50.0, day(2024, 6, 3), at(2024, 6, 12));
        assert_eq!(stats.weekly_totals(), totals(10.0, 100.0));
        assert_eq!(stats.monthly_totals(), totals(15.0, 150.0));
        assert_eq!(stats.yearly_totals(), totals(15.0, 150.0));

        // Same week
        stats.record_on_at(1.0, 10.0, day(2024, 6, 10), at(2024, 6, 12));
        assert_eq!(stats.weekly_totals(), totals(11.0, 110.0));
    }

    #[test]
    fn test_session_dated_today_uses_rollover() {
        let mut stats = TrainingStats::new();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        stats.record_on_at(10.0, 100.0, day, at(2024, 3, 1));

        assert_eq!(stats.monthly_totals(), PeriodTotals::default());
        assert_eq!(stats.yearly_totals(), totals(10.0, 100.0));
    }

    #[test]
    fn test_clear() {
        let mut stats = TrainingStats::new();
        stats.record_at(42.0, 420.0, at(2024, 5, 20));
        stats.clear();
        assert_eq!(stats, TrainingStats::default());
    }

    #[test]
    fn test_wire_format() {
        let mut stats = TrainingStats::new();
        stats.record_at(1.5, 20.0, at(2024, 5, 20));
        let value = serde_json::to_value(stats).unwrap();

        assert_eq!(value["semana"]["km"], 1.5);
        assert_eq!(value["mes"]["desnivel"], 20.0);
        assert_eq!(value["anio"]["km"], 1.5);

        let parsed: TrainingStats = serde_json::from_value(serde_json::json!({
            "semana": { "km": 50, "desnivel": 1000 },
            "mes": { "km": 200, "desnivel": 5000 },
            "anio": { "km": 1000, "desnivel": 20000 }
        }))
        .unwrap();
        assert_eq!(parsed.yearly_totals(), totals(1000.0, 20000.0));
    }
}
