//! Busy-interval reconciliation: merge raw events, answer overlap queries.
//!
//! Sorts localized events by start, then sweeps: an event whose start is
//! `<=` the open interval's end extends it. The `<=` matters — short-stay
//! calendars chain reservations with one guest's checkout stamp equal to
//! the next guest's checkin, and those must read as a single busy block.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::event::{BusyEvent, MergedInterval};

/// Margin added to each side of the query window so adjacent events are
/// pulled in and coalesced at the boundary.
const ADJACENCY_MARGIN_DAYS: i64 = 1;

/// Merge the raw `events` near `[query_start, query_end)` into disjoint
/// busy intervals, sorted by start.
///
/// The window is expanded by one day on both sides before filtering.
/// Events are localized to the query's timezone (date-only stamps become
/// local midnight, a missing end defaults to one night) and kept whole —
/// no clipping, so conflict bounds show real reservation extents. Each
/// merged interval accumulates the summaries of its contributing events.
pub fn reconcile(
    events: &[BusyEvent],
    query_start: DateTime<Tz>,
    query_end: DateTime<Tz>,
) -> Vec<MergedInterval> {
    let window_start = query_start - Duration::days(ADJACENCY_MARGIN_DAYS);
    let window_end = query_end + Duration::days(ADJACENCY_MARGIN_DAYS);
    let tz = query_start.timezone();

    let mut localized: Vec<(DateTime<Tz>, DateTime<Tz>, &str)> = events
        .iter()
        .map(|ev| {
            let start = ev.start.to_zoned(tz);
            let end = match ev.end {
                Some(stamp) => stamp.to_zoned(tz),
                None => start + Duration::days(1),
            };
            (start, end, ev.summary.as_str())
        })
        .filter(|(start, end, _)| *start < window_end && *end > window_start)
        .collect();

    if localized.is_empty() {
        return Vec::new();
    }

    localized.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut merged: Vec<MergedInterval> = Vec::new();
    for (start, end, summary) in localized {
        if let Some(last) = merged.last_mut() {
            // Overlapping or touching — extend the open interval.
            if start <= last.end {
                if end > last.end {
                    last.end = end;
                }
                last.labels.insert(summary.to_string());
                continue;
            }
        }
        merged.push(MergedInterval {
            start,
            end,
            labels: BTreeSet::from([summary.to_string()]),
        });
    }

    merged
}

/// Every merged interval overlapping `[request_start, request_end)` under
/// the standard half-open test: `request_start < end && start < request_end`.
pub fn overlapping(
    merged: &[MergedInterval],
    request_start: DateTime<Tz>,
    request_end: DateTime<Tz>,
) -> Vec<MergedInterval> {
    merged
        .iter()
        .filter(|m| request_start < m.end && m.start < request_end)
        .cloned()
        .collect()
}
