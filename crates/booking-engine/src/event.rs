//! Busy-calendar event types and working-timezone normalization.
//!
//! Short-stay feeds mix stamp formats freely: date-only values for whole-day
//! reservations, floating local timestamps, and fully zoned instants. All
//! calendar math in this crate happens after normalizing to one fixed
//! working timezone.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// The fixed working timezone all reconciliation happens in.
pub const HOST_TZ: Tz = Tz::America__Argentina__Buenos_Aires;

/// A calendar timestamp as feeds actually deliver them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventStamp {
    /// RFC 3339 instant with an offset ("2026-02-02T14:00:00Z").
    Zoned(DateTime<Utc>),
    /// Floating local timestamp, interpreted in the working timezone.
    Floating(NaiveDateTime),
    /// Date-only value, treated as midnight in the working timezone.
    Date(NaiveDate),
}

impl EventStamp {
    /// Normalize to a timezone-aware instant in `tz`.
    pub fn to_zoned(self, tz: Tz) -> DateTime<Tz> {
        match self {
            EventStamp::Zoned(dt) => dt.with_timezone(&tz),
            EventStamp::Floating(ndt) => localize(tz, ndt),
            EventStamp::Date(d) => localize(tz, d.and_time(NaiveTime::MIN)),
        }
    }
}

/// Resolve a naive local time in `tz`, tolerating DST folds and gaps.
fn localize(tz: Tz, ndt: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&ndt) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Spring-forward gap: the wall time does not exist, take the first
        // valid instant an hour later.
        LocalResult::None => tz
            .from_local_datetime(&(ndt + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&ndt)),
    }
}

/// One busy occurrence from a calendar feed, recurrences already expanded.
///
/// A missing `end` means the feed omitted the checkout stamp; the
/// reconciler assigns the default one-night duration. Ephemeral —
/// recomputed on every query, never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusyEvent {
    #[serde(default = "default_summary")]
    pub summary: String,
    pub start: EventStamp,
    #[serde(default)]
    pub end: Option<EventStamp>,
}

fn default_summary() -> String {
    "Reserva".to_string()
}

impl BusyEvent {
    pub fn new(summary: impl Into<String>, start: EventStamp, end: Option<EventStamp>) -> Self {
        BusyEvent {
            summary: summary.into(),
            start,
            end,
        }
    }
}

/// A maximal run of overlapping-or-touching busy events.
///
/// Produced sorted by start and pairwise disjoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedInterval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Summaries of every contributing event, deduplicated.
    pub labels: BTreeSet<String>,
}

impl MergedInterval {
    /// Display label joining all contributing summaries.
    pub fn label(&self) -> String {
        self.labels
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Whole nights spanned, by calendar date in the working timezone.
    pub fn nights(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days()
    }
}
