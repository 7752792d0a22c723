// SPDX-License-Identifier: MIT

//! Canonical scoring-week window math.
//!
//! Every part of the system that needs to know "which week is this score or
//! group in" must go through these functions. The rollover engine and the
//! leaderboard read path both key off the same week-start timestamp; inlining
//! this date math at a call site is how the two drift apart.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

/// Start of the current scoring week: the most recent Monday at 00:00:00 UTC.
///
/// Pure function of `now`; hours/minutes/seconds/nanos are zeroed.
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive();
    let days_into_week = date.weekday().num_days_from_monday() as i64;
    let monday = date - Duration::days(days_into_week);
    monday.and_time(NaiveTime::MIN).and_utc()
}

/// Exclusive end of the current scoring week.
pub fn week_end(now: DateTime<Utc>) -> DateTime<Utc> {
    week_start(now) + Duration::days(7)
}

/// Start of the scoring week that just finished.
pub fn previous_week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    week_start(now) - Duration::days(7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_week_start_truncates_to_monday_midnight() {
        // 2025-06-19 is a Thursday
        let start = week_start(utc(2025, 6, 19, 15, 42, 7));
        assert_eq!(start, utc(2025, 6, 16, 0, 0, 0));
    }

    #[test]
    fn test_week_start_on_monday_is_identity_at_midnight() {
        let monday_noon = utc(2025, 6, 16, 12, 0, 0);
        assert_eq!(week_start(monday_noon), utc(2025, 6, 16, 0, 0, 0));
        // Already at the boundary: fixed point
        let boundary = utc(2025, 6, 16, 0, 0, 0);
        assert_eq!(week_start(boundary), boundary);
    }

    #[test]
    fn test_week_start_idempotent_within_week() {
        let a = week_start(utc(2025, 6, 16, 0, 0, 1));
        let b = week_start(utc(2025, 6, 22, 23, 59, 59));
        assert_eq!(a, b);
    }

    #[test]
    fn test_consecutive_weeks_differ_by_exactly_seven_days() {
        let now = utc(2025, 6, 19, 10, 0, 0);
        let next = now + Duration::days(7);
        assert_eq!(week_start(next) - week_start(now), Duration::days(7));
    }

    #[test]
    fn test_week_end_is_start_plus_seven_days() {
        let now = utc(2025, 6, 19, 10, 0, 0);
        assert_eq!(week_end(now), week_start(now) + Duration::days(7));
        assert_eq!(week_end(now), utc(2025, 6, 23, 0, 0, 0));
    }

    #[test]
    fn test_previous_week_start() {
        let now = utc(2025, 6, 19, 10, 0, 0);
        assert_eq!(previous_week_start(now), utc(2025, 6, 9, 0, 0, 0));
    }

    #[test]
    fn test_week_start_across_year_boundary() {
        // 2026-01-01 is a Thursday; its week starts Monday 2025-12-29
        let start = week_start(utc(2026, 1, 1, 8, 30, 0));
        assert_eq!(start, utc(2025, 12, 29, 0, 0, 0));
    }
}
