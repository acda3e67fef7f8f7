//! Availability evaluation — from a raw guest message to a verified verdict.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use guest_intake::dates::{parse_date_ranges, DateRange};

use crate::calendar::CalendarSource;
use crate::event::{EventStamp, MergedInterval, HOST_TZ};
use crate::reconcile::{overlapping, reconcile};

/// Verified availability state for a requested range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable,
    /// The calendar source could not be fetched or parsed; `reason` carries
    /// the diagnostic. Not a failure of the request itself.
    Unknown { reason: String },
}

/// Outcome of an evaluation that reached the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityVerdict {
    pub requested: DateRange,
    pub availability: Availability,
    /// Busy blocks overlapping the request, disjoint and sorted by start.
    pub conflicts: Vec<MergedInterval>,
    pub nights: i64,
    /// Human-readable summary sentence; verified facts quote it verbatim.
    pub detail: String,
}

/// Why an evaluation could not even reach the calendar.
///
/// Checks are terminal and run in a fixed order; the Display strings are
/// guest-facing Spanish and stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("Necesito saber a que propiedad te referis.")]
    MissingProperty,
    #[error("No puedo verificar disponibilidad de {0}.")]
    NoCalendar(String),
    #[error("Necesito fechas de check-in y check-out.")]
    MissingDates,
    #[error("Check-out debe ser posterior a check-in.")]
    CheckoutNotAfterCheckin,
    #[error("La fecha {} ya paso.", .0.format("%d/%m/%Y"))]
    DatePassed(NaiveDate),
}

/// Extract a date range from `text` and verify it against the property's
/// busy calendar.
///
/// Rejection ladder, each step terminal: missing property, missing
/// calendar handle, no parseable dates, checkout not after checkin
/// (re-validated here as the public contract, whatever the parser did),
/// checkin already past. A source that cannot be fetched yields an
/// [`Availability::Unknown`] verdict rather than an error.
pub fn evaluate(
    text: &str,
    property_id: Option<&str>,
    source: Option<&dyn CalendarSource>,
    today: NaiveDate,
) -> Result<AvailabilityVerdict, Rejection> {
    let property = property_id.ok_or(Rejection::MissingProperty)?;
    let source = source.ok_or_else(|| Rejection::NoCalendar(property.to_string()))?;

    let ranges = parse_date_ranges(text, today);
    let Some(requested) = ranges.first().copied() else {
        return Err(Rejection::MissingDates);
    };

    if requested.checkout <= requested.checkin {
        return Err(Rejection::CheckoutNotAfterCheckin);
    }
    if requested.checkin < today {
        return Err(Rejection::DatePassed(requested.checkin));
    }

    let nights = requested.nights();

    let events = match source.fetch() {
        Ok(events) => events,
        Err(err) => {
            warn!(property, error = %err, "calendar source unavailable");
            return Ok(AvailabilityVerdict {
                requested,
                availability: Availability::Unknown {
                    reason: err.to_string(),
                },
                conflicts: Vec::new(),
                nights,
                detail: format!("Error: {err}"),
            });
        }
    };

    let query_start = EventStamp::Date(requested.checkin).to_zoned(HOST_TZ);
    let query_end = EventStamp::Date(requested.checkout).to_zoned(HOST_TZ);

    let merged = reconcile(&events, query_start, query_end);
    let conflicts = overlapping(&merged, query_start, query_end);
    debug!(
        property,
        busy_blocks = merged.len(),
        conflicts = conflicts.len(),
        "availability reconciled"
    );

    let (availability, detail) = match conflicts.first() {
        None => (
            Availability::Available,
            format!(
                "DISPONIBLE del {} al {} ({} noche{}).",
                requested.checkin.format("%d/%m/%Y"),
                requested.checkout.format("%d/%m/%Y"),
                nights,
                if nights > 1 { "s" } else { "" },
            ),
        ),
        Some(first) => (
            Availability::Unavailable,
            format!(
                "NO DISPONIBLE. Hay una reserva del {} al {}.",
                first.start.date_naive().format("%Y-%m-%d"),
                first.end.date_naive().format("%Y-%m-%d"),
            ),
        ),
    };

    Ok(AvailabilityVerdict {
        requested,
        availability,
        conflicts,
        nights,
        detail,
    })
}
