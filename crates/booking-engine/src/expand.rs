//! Recurrence expansion — RRULE strings into concrete stay occurrences.
//!
//! Calendar feeds may describe recurring blocks (weekly maintenance, a
//! standing owner stay) as RFC 5545 rules. Sources expand them here before
//! handing events over, so the reconciler only ever sees discrete
//! occurrences.

use chrono::{DateTime, Duration, Utc};
use rrule::RRuleSet;

use crate::error::{CalendarError, Result};

/// Cap on instances when neither the rule nor the caller bounds expansion.
const MAX_INSTANCES: u16 = 500;

/// Expand an RRULE into concrete `[start, end)` occurrences.
///
/// # Arguments
/// - `rule` -- RFC 5545 RRULE string (e.g., "FREQ=WEEKLY;BYDAY=MO")
/// - `dtstart` -- Local datetime string (e.g., "2026-02-17T00:00:00")
/// - `nights` -- Duration of each occurrence in whole days
/// - `timezone` -- IANA timezone the rule runs in
/// - `until` -- Optional end boundary (local datetime string)
/// - `count` -- Optional maximum number of occurrences
/// - `exdates` -- Cancelled occurrences to exclude (same format as `dtstart`)
///
/// # Errors
/// Returns `CalendarError::InvalidRule` if the RRULE string is empty or
/// unparseable, `CalendarError::InvalidTimezone` for an unknown IANA zone.
pub fn expand_recurrence(
    rule: &str,
    dtstart: &str,
    nights: u32,
    timezone: &str,
    until: Option<&str>,
    count: Option<u32>,
    exdates: &[String],
) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>> {
    if rule.is_empty() {
        return Err(CalendarError::InvalidRule("empty RRULE string".to_string()));
    }

    // Short-circuit: caller explicitly wants zero occurrences.
    if count == Some(0) {
        return Ok(Vec::new());
    }

    // Validate the zone before building the iCalendar block.
    let _tz: chrono_tz::Tz = timezone
        .parse()
        .map_err(|_| CalendarError::InvalidTimezone(timezone.to_string()))?;

    // "2026-02-17T00:00:00" → iCalendar "20260217T000000".
    let dtstart_ical = dtstart.replace(['-', ':'], "");

    let mut rule_str = rule.to_string();
    if let Some(c) = count {
        if !rule_str.to_uppercase().contains("COUNT=") {
            rule_str = format!("{rule_str};COUNT={c}");
        }
    }

    // UNTIL must share DTSTART's timezone: bare local time, with a "Z"
    // suffix only for UTC.
    if let Some(until_str) = until {
        if !rule_str.to_uppercase().contains("UNTIL=") {
            let mut until_ical = until_str.replace(['-', ':'], "");
            if timezone == "UTC" {
                until_ical.push('Z');
            }
            rule_str = format!("{rule_str};UNTIL={until_ical}");
        }
    }

    let mut rule_text = format!("DTSTART;TZID={timezone}:{dtstart_ical}\nRRULE:{rule_str}");
    if !exdates.is_empty() {
        let exdate_icals: Vec<String> = exdates.iter().map(|d| d.replace(['-', ':'], "")).collect();
        rule_text.push_str(&format!(
            "\nEXDATE;TZID={timezone}:{}",
            exdate_icals.join(",")
        ));
    }

    let rule_set: RRuleSet = rule_text
        .parse()
        .map_err(|e| CalendarError::InvalidRule(format!("{e}")))?;

    // The expansion limit counts instances BEFORE exdate filtering, so
    // excluded dates need headroom on top of the requested count.
    let exdate_buffer = exdates.len() as u16;
    let limit: u16 = count
        .map(|c| (c as u16).saturating_add(exdate_buffer))
        .unwrap_or(MAX_INSTANCES);

    let instances = rule_set.all(limit);
    let duration = Duration::days(i64::from(nights));

    let mut occurrences: Vec<(DateTime<Utc>, DateTime<Utc>)> = instances
        .dates
        .into_iter()
        .map(|dt| {
            let start: DateTime<Utc> = dt.with_timezone(&Utc);
            (start, start + duration)
        })
        .collect();

    // The `.all()` limit is a pre-filter cap; trim to the caller's count
    // in case exdate headroom produced extras.
    if let Some(c) = count {
        occurrences.truncate(c as usize);
    }

    Ok(occurrences)
}
