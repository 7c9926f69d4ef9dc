//! Worked-time computation over one user's day of events.

use crate::model::time_log::{AttendanceEvent, EventKind};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Sums the work segments of an ascending, single-day event slice.
///
/// Every event closes the leg that started at the previous event and opens the
/// next one. Legs that start at a `BreakStart` are break time and are never
/// credited, so an unmatched `BreakStart` at the end of the day adds nothing.
/// Malformed days never fail: any stretch without an open leg contributes nothing.
pub fn compute_worked_seconds(events: &[AttendanceEvent]) -> f64 {
    let mut total_ms: i64 = 0;
    let mut segment_start = None;
    let mut on_break = false;

    for event in events {
        match event.kind {
            EventKind::CheckIn => {
                segment_start = Some(event.timestamp);
                on_break = false;
            }
            EventKind::BreakStart => {
                if let Some(start) = segment_start.filter(|_| !on_break) {
                    total_ms += (event.timestamp - start).num_milliseconds().max(0);
                }
                segment_start = Some(event.timestamp);
                on_break = true;
            }
            EventKind::BreakEnd | EventKind::CheckOut => {
                if let Some(start) = segment_start.filter(|_| !on_break) {
                    total_ms += (event.timestamp - start).num_milliseconds().max(0);
                }
                segment_start = Some(event.timestamp);
                on_break = false;
            }
        }
    }

    total_ms as f64 / 1000.0
}

pub fn to_hours(seconds: f64) -> f64 {
    seconds / SECONDS_PER_HOUR
}

/// Two decimals, for display.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use EventKind::*;

    fn day(events: &[(EventKind, u32, u32)]) -> Vec<AttendanceEvent> {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        events
            .iter()
            .enumerate()
            .map(|(i, (kind, h, m))| AttendanceEvent {
                id: i as u64 + 1,
                user_id: 1,
                kind: *kind,
                timestamp: Utc.with_ymd_and_hms(2026, 1, 5, *h, *m, 0).unwrap(),
                work_date: date,
            })
            .collect()
    }

    #[test]
    fn test_full_day_with_break() {
        let events = day(&[(CheckIn, 9, 0), (BreakStart, 12, 0), (BreakEnd, 12, 30), (CheckOut, 17, 0)]);
        let seconds = compute_worked_seconds(&events);
        assert_eq!(seconds, 27000.0);
        assert_eq!(to_hours(seconds), 7.5);
    }

    #[test]
    fn test_empty_and_open_day() {
        assert_eq!(compute_worked_seconds(&[]), 0.0);
        assert_eq!(compute_worked_seconds(&day(&[(CheckIn, 9, 0)])), 0.0);
    }

    #[test]
    fn test_open_break_credits_only_the_work_before_it() {
        let events = day(&[(CheckIn, 9, 0), (BreakStart, 11, 0)]);
        assert_eq!(compute_worked_seconds(&events), 2.0 * 3600.0);
    }

    #[test]
    fn test_break_interval_is_not_work() {
        let short = day(&[(CheckIn, 9, 0), (BreakStart, 10, 0), (BreakEnd, 10, 15), (CheckOut, 11, 0)]);
        let long = day(&[(CheckIn, 9, 0), (BreakStart, 10, 0), (BreakEnd, 10, 45), (CheckOut, 11, 30)]);
        // 1h before the break plus 45m after it, regardless of break length
        assert_eq!(compute_worked_seconds(&short), 6300.0);
        assert_eq!(compute_worked_seconds(&long), 6300.0);
    }

    #[test]
    fn test_multiple_breaks() {
        let events = day(&[
            (CheckIn, 8, 0),
            (BreakStart, 10, 0),
            (BreakEnd, 10, 30),
            (BreakStart, 12, 30),
            (BreakEnd, 13, 0),
            (CheckOut, 16, 0),
        ]);
        assert_eq!(to_hours(compute_worked_seconds(&events)), 7.0);
    }

    #[test]
    fn test_missing_check_in_accumulates_nothing_until_a_segment_opens() {
        let events = day(&[(CheckOut, 17, 0)]);
        assert_eq!(compute_worked_seconds(&events), 0.0);
    }

    #[test]
    fn test_round_hours() {
        assert_eq!(round_hours(7.499_999), 7.5);
        assert_eq!(round_hours(1.0 / 3.0), 0.33);
    }
}
