//! Property tests for year inference and parser totality.

use chrono::{Duration, NaiveDate};
use guest_intake::{infer_year_and_month, parse_date_ranges};
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid base date")
}

proptest! {
    /// Year inference never lands strictly before the reference date: the
    /// inferred occurrence is always today or in the future.
    #[test]
    fn inferred_date_is_never_past(
        day in 1u32..=31,
        month in 1u32..=12,
        today_offset in 0i64..=3650,
    ) {
        let today = base() + Duration::days(today_offset);
        let (year, month) = infer_year_and_month(day, Some(month), today);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            prop_assert!(date >= today, "{date} is before {today}");
        }
    }

    /// The month default follows the reference date.
    #[test]
    fn defaulted_month_is_reference_month(
        day in 1u32..=28,
        today_offset in 0i64..=3650,
    ) {
        use chrono::Datelike;
        let today = base() + Duration::days(today_offset);
        let (_, month) = infer_year_and_month(day, None, today);
        prop_assert_eq!(month, today.month());
    }

    /// The parser is total over arbitrary text and every range it emits is
    /// well-ordered.
    #[test]
    fn parser_never_panics_and_ranges_are_ordered(
        text in ".{0,200}",
        today_offset in 0i64..=3650,
    ) {
        let today = base() + Duration::days(today_offset);
        for range in parse_date_ranges(&text, today) {
            prop_assert!(range.checkout >= range.checkin);
        }
    }
}
