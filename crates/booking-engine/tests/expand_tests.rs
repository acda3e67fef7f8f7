//! Tests for RRULE expansion of recurring feed entries.

use booking_engine::error::CalendarError;
use booking_engine::expand_recurrence;
use chrono::{DateTime, Duration, TimeZone, Utc};

const BA: &str = "America/Argentina/Buenos_Aires";

fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().expect("valid instant")
}

#[test]
fn weekly_rule_with_count() {
    // 2026-01-05 is a Monday; Buenos Aires is UTC-3.
    let occurrences = expand_recurrence(
        "FREQ=WEEKLY;BYDAY=MO",
        "2026-01-05T00:00:00",
        1,
        BA,
        None,
        Some(4),
        &[],
    )
    .expect("rule must expand");

    assert_eq!(occurrences.len(), 4);
    assert_eq!(occurrences[0].0, utc(2026, 1, 5, 3));
    assert_eq!(occurrences[0].1, utc(2026, 1, 6, 3));
    for window in occurrences.windows(2) {
        assert_eq!(window[1].0 - window[0].0, Duration::days(7));
    }
}

#[test]
fn exdate_removes_cancelled_occurrence() {
    let occurrences = expand_recurrence(
        "FREQ=WEEKLY;BYDAY=MO;COUNT=4",
        "2026-01-05T00:00:00",
        1,
        BA,
        None,
        None,
        &["2026-01-12T00:00:00".to_string()],
    )
    .expect("rule must expand");

    assert_eq!(occurrences.len(), 3);
    assert!(!occurrences.iter().any(|(start, _)| *start == utc(2026, 1, 12, 3)));
}

#[test]
fn until_bounds_daily_rule() {
    let occurrences = expand_recurrence(
        "FREQ=DAILY",
        "2026-01-05T00:00:00",
        1,
        "UTC",
        Some("2026-01-08T00:00:00"),
        None,
        &[],
    )
    .expect("rule must expand");

    // UNTIL is inclusive: Jan 5 through Jan 8.
    assert_eq!(occurrences.len(), 4);
    assert_eq!(occurrences[0].0, utc(2026, 1, 5, 0));
    assert_eq!(occurrences[3].0, utc(2026, 1, 8, 0));
}

#[test]
fn multi_night_occurrences() {
    let occurrences = expand_recurrence(
        "FREQ=MONTHLY;BYMONTHDAY=1",
        "2026-01-01T00:00:00",
        3,
        "UTC",
        None,
        Some(2),
        &[],
    )
    .expect("rule must expand");

    assert_eq!(occurrences.len(), 2);
    for (start, end) in &occurrences {
        assert_eq!(*end - *start, Duration::days(3));
    }
}

#[test]
fn empty_rule_is_invalid() {
    let err = expand_recurrence("", "2026-01-05T00:00:00", 1, BA, None, None, &[])
        .expect_err("empty rule must fail");
    assert!(matches!(err, CalendarError::InvalidRule(_)));
}

#[test]
fn unknown_timezone_is_invalid() {
    let err = expand_recurrence(
        "FREQ=DAILY",
        "2026-01-05T00:00:00",
        1,
        "America/Nowhere",
        None,
        Some(1),
        &[],
    )
    .expect_err("bad timezone must fail");
    assert!(matches!(err, CalendarError::InvalidTimezone(_)));
}

#[test]
fn zero_count_short_circuits() {
    let occurrences = expand_recurrence(
        "FREQ=DAILY",
        "2026-01-05T00:00:00",
        1,
        BA,
        None,
        Some(0),
        &[],
    )
    .expect("zero count is not an error");
    assert!(occurrences.is_empty());
}
