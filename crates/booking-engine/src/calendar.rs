//! Calendar sources — the fetch boundary between the core and the outside.
//!
//! The engine only requires [`CalendarSource::fetch`]: a flat list of busy
//! occurrences with recurrences already expanded. [`JsonFeed`] is the
//! bundled file-backed source; [`StaticCalendar`] serves tests and
//! embedding callers.

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{CalendarError, Result};
use crate::event::{BusyEvent, EventStamp};
use crate::expand::expand_recurrence;

/// A busy-calendar feed for one property.
///
/// Implementors report transport problems as [`CalendarError::Fetch`] and
/// malformed documents as [`CalendarError::Parse`]; the evaluator converts
/// either into an "unknown" verdict instead of failing the request.
pub trait CalendarSource {
    fn fetch(&self) -> Result<Vec<BusyEvent>>;
}

/// Fixed in-memory event list.
pub struct StaticCalendar(pub Vec<BusyEvent>);

impl CalendarSource for StaticCalendar {
    fn fetch(&self) -> Result<Vec<BusyEvent>> {
        Ok(self.0.clone())
    }
}

fn default_summary() -> String {
    "Reserva".to_string()
}

fn default_nights() -> u32 {
    1
}

fn default_timezone() -> String {
    "America/Argentina/Buenos_Aires".to_string()
}

/// One entry of a [`JsonFeed`] document: a discrete stay, or a recurring
/// block when `rrule` is present.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedEntry {
    #[serde(default = "default_summary")]
    summary: String,
    start: EventStamp,
    #[serde(default)]
    end: Option<EventStamp>,
    #[serde(default)]
    rrule: Option<String>,
    /// Occurrence length for recurring entries, in whole nights.
    #[serde(default = "default_nights")]
    nights: u32,
    #[serde(default)]
    until: Option<String>,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    exdates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FeedDocument {
    #[serde(default = "default_timezone")]
    timezone: String,
    #[serde(default)]
    events: Vec<FeedEntry>,
}

/// File-backed JSON feed: a document with an optional `timezone` and an
/// `events` array mixing plain and recurring entries.
pub struct JsonFeed {
    path: PathBuf,
}

impl JsonFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFeed { path: path.into() }
    }
}

impl CalendarSource for JsonFeed {
    fn fetch(&self) -> Result<Vec<BusyEvent>> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| CalendarError::Fetch(format!("{}: {e}", self.path.display())))?;
        parse_feed(&raw)
    }
}

/// Parse a feed document and expand its recurring entries.
pub fn parse_feed(raw: &str) -> Result<Vec<BusyEvent>> {
    let doc: FeedDocument =
        serde_json::from_str(raw).map_err(|e| CalendarError::Parse(e.to_string()))?;
    let tz: Tz = doc
        .timezone
        .parse()
        .map_err(|_| CalendarError::InvalidTimezone(doc.timezone.clone()))?;

    let mut events = Vec::new();
    for entry in doc.events {
        match entry.rrule {
            Some(rule) => {
                let dtstart = dtstart_local(entry.start, tz);
                let occurrences = expand_recurrence(
                    &rule,
                    &dtstart,
                    entry.nights,
                    &doc.timezone,
                    entry.until.as_deref(),
                    entry.count,
                    &entry.exdates,
                )?;
                for (start, end) in occurrences {
                    events.push(BusyEvent {
                        summary: entry.summary.clone(),
                        start: EventStamp::Zoned(start),
                        end: Some(EventStamp::Zoned(end)),
                    });
                }
            }
            None => events.push(BusyEvent {
                summary: entry.summary,
                start: entry.start,
                end: entry.end,
            }),
        }
    }
    Ok(events)
}

/// Render a stamp as the local datetime string `expand_recurrence` expects.
fn dtstart_local(stamp: EventStamp, tz: Tz) -> String {
    stamp
        .to_zoned(tz)
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}
