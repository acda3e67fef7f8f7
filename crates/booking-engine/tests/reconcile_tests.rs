//! Tests for busy-interval merging and overlap queries, including the
//! boundary policy: touching events coalesce (`<=` in the merge sweep),
//! while the overlap query itself stays strictly half-open.

use booking_engine::{overlapping, reconcile, BusyEvent, EventStamp, HOST_TZ};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid test date")
}

fn zoned(y: i32, m: u32, day: u32) -> DateTime<Tz> {
    EventStamp::Date(d(y, m, day)).to_zoned(HOST_TZ)
}

fn ev(summary: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> BusyEvent {
    BusyEvent::new(
        summary,
        EventStamp::Date(d(start.0, start.1, start.2)),
        Some(EventStamp::Date(d(end.0, end.1, end.2))),
    )
}

#[test]
fn touching_events_merge_into_one_block() {
    // Checkout on Jan 15 equals the next checkin: one busy block.
    let events = vec![
        ev("Reserva A", (2026, 1, 10), (2026, 1, 15)),
        ev("Reserva B", (2026, 1, 15), (2026, 1, 20)),
    ];
    let merged = reconcile(&events, zoned(2026, 1, 1), zoned(2026, 1, 31));

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].start, zoned(2026, 1, 10));
    assert_eq!(merged[0].end, zoned(2026, 1, 20));
    assert_eq!(merged[0].label(), "Reserva A | Reserva B");
}

#[test]
fn disjoint_sorted_input_is_unchanged() {
    let events = vec![
        ev("Reserva A", (2026, 1, 1), (2026, 1, 3)),
        ev("Reserva B", (2026, 1, 10), (2026, 1, 12)),
    ];
    let merged = reconcile(&events, zoned(2026, 1, 1), zoned(2026, 1, 31));

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].start, zoned(2026, 1, 1));
    assert_eq!(merged[0].end, zoned(2026, 1, 3));
    assert_eq!(merged[1].start, zoned(2026, 1, 10));
    assert_eq!(merged[1].end, zoned(2026, 1, 12));
}

#[test]
fn overlapping_events_extend_the_open_interval() {
    let events = vec![
        ev("Reserva A", (2026, 1, 10), (2026, 1, 14)),
        ev("Reserva B", (2026, 1, 12), (2026, 1, 20)),
    ];
    let merged = reconcile(&events, zoned(2026, 1, 1), zoned(2026, 1, 31));

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].start, zoned(2026, 1, 10));
    assert_eq!(merged[0].end, zoned(2026, 1, 20));
}

#[test]
fn contained_event_does_not_shrink_the_interval() {
    let events = vec![
        ev("Reserva A", (2026, 1, 10), (2026, 1, 20)),
        ev("Reserva B", (2026, 1, 12), (2026, 1, 14)),
    ];
    let merged = reconcile(&events, zoned(2026, 1, 1), zoned(2026, 1, 31));

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].end, zoned(2026, 1, 20));
}

#[test]
fn unsorted_input_is_sorted_before_merging() {
    let events = vec![
        ev("Reserva B", (2026, 1, 10), (2026, 1, 12)),
        ev("Reserva A", (2026, 1, 1), (2026, 1, 3)),
    ];
    let merged = reconcile(&events, zoned(2026, 1, 1), zoned(2026, 1, 31));

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].start, zoned(2026, 1, 1));
}

#[test]
fn missing_end_defaults_to_one_night() {
    let events = vec![BusyEvent::new(
        "Reserva",
        EventStamp::Date(d(2026, 1, 10)),
        None,
    )];
    let merged = reconcile(&events, zoned(2026, 1, 1), zoned(2026, 1, 31));

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].start, zoned(2026, 1, 10));
    assert_eq!(merged[0].end, zoned(2026, 1, 11));
    assert_eq!(merged[0].nights(), 1);
}

#[test]
fn duplicate_labels_are_deduplicated() {
    let events = vec![
        ev("Reserva", (2026, 1, 10), (2026, 1, 13)),
        ev("Reserva", (2026, 1, 12), (2026, 1, 15)),
    ];
    let merged = reconcile(&events, zoned(2026, 1, 1), zoned(2026, 1, 31));

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].labels.len(), 1);
    assert_eq!(merged[0].label(), "Reserva");
}

#[test]
fn events_outside_the_expanded_window_are_dropped() {
    let events = vec![
        ev("Lejana", (2026, 3, 1), (2026, 3, 5)),
        ev("Cercana", (2026, 1, 12), (2026, 1, 14)),
    ];
    let merged = reconcile(&events, zoned(2026, 1, 10), zoned(2026, 1, 15));

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].label(), "Cercana");
}

#[test]
fn adjacent_event_enters_window_via_margin_but_not_overlap() {
    // Event [Jan 15, Jan 17) sits just past the query [Jan 10, Jan 15):
    // the one-day margin pulls it into the merged view, but the half-open
    // overlap query must not report it.
    let events = vec![ev("Siguiente", (2026, 1, 15), (2026, 1, 17))];
    let merged = reconcile(&events, zoned(2026, 1, 10), zoned(2026, 1, 15));
    assert_eq!(merged.len(), 1);

    let conflicts = overlapping(&merged, zoned(2026, 1, 10), zoned(2026, 1, 15));
    assert!(conflicts.is_empty());
}

#[test]
fn request_inside_busy_block_conflicts() {
    let events = vec![ev("Reserva", (2026, 1, 10), (2026, 1, 15))];
    let merged = reconcile(&events, zoned(2026, 1, 12), zoned(2026, 1, 14));

    let conflicts = overlapping(&merged, zoned(2026, 1, 12), zoned(2026, 1, 14));
    assert_eq!(conflicts.len(), 1);
}

#[test]
fn boundary_policy_single_event_checkout_day_is_free() {
    // Busy [Jan 10, Jan 15): a request starting exactly on the checkout
    // day does not conflict — half-open all the way through.
    let events = vec![ev("Reserva", (2026, 1, 10), (2026, 1, 15))];
    let merged = reconcile(&events, zoned(2026, 1, 15), zoned(2026, 1, 17));

    let conflicts = overlapping(&merged, zoned(2026, 1, 15), zoned(2026, 1, 17));
    assert!(conflicts.is_empty());
}

#[test]
fn boundary_policy_chained_reservations_block_the_checkout_day() {
    // Two back-to-back reservations merge across Jan 15, so a request
    // starting on Jan 15 now lands inside the coalesced block.
    let events = vec![
        ev("Reserva A", (2026, 1, 10), (2026, 1, 15)),
        ev("Reserva B", (2026, 1, 15), (2026, 1, 20)),
    ];
    let merged = reconcile(&events, zoned(2026, 1, 15), zoned(2026, 1, 17));
    assert_eq!(merged.len(), 1);

    let conflicts = overlapping(&merged, zoned(2026, 1, 15), zoned(2026, 1, 17));
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].start, zoned(2026, 1, 10));
    assert_eq!(conflicts[0].end, zoned(2026, 1, 20));
}

#[test]
fn reconcile_twice_is_idempotent() {
    let events = vec![
        ev("Reserva A", (2026, 1, 10), (2026, 1, 15)),
        ev("Reserva B", (2026, 1, 15), (2026, 1, 20)),
        ev("Reserva C", (2026, 2, 1), (2026, 2, 3)),
    ];
    let first = reconcile(&events, zoned(2026, 1, 1), zoned(2026, 2, 28));
    let second = reconcile(&events, zoned(2026, 1, 1), zoned(2026, 2, 28));
    assert_eq!(first, second);
}
