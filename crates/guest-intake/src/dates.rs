//! Cascading date-range parser for colloquial Spanish.
//!
//! Converts expressions like "del 10 al 15 de enero", "2/2 al 5/2" or
//! "el viernes que viene" into concrete half-open `[checkin, checkout)`
//! ranges relative to a reference date.
//!
//! Three pattern families are tried in strict priority order — explicit
//! day/month-name expressions, numeric day/month pairs, then relative
//! expressions — and the first family producing a result wins. Families
//! never merge their results. Within the explicit family the sub-patterns
//! form a second fixed-order table; a candidate that names an impossible
//! calendar date (31 de abril) is silently discarded and matching moves on.

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::normalize::normalize;

/// A half-open stay: the guest occupies every night in `[checkin, checkout)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

impl DateRange {
    /// Number of nights covered by the range.
    pub fn nights(&self) -> i64 {
        (self.checkout - self.checkin).num_days()
    }
}

/// Spanish weekday names, Monday-first, aligned with chrono's
/// `num_days_from_monday` numbering.
const WEEKDAY_NAMES: [(&str, u32); 7] = [
    ("lunes", 0),
    ("martes", 1),
    ("miercoles", 2),
    ("jueves", 3),
    ("viernes", 4),
    ("sabado", 5),
    ("domingo", 6),
];

/// Month number for a normalized Spanish month name or abbreviation.
fn month_number(name: &str) -> Option<u32> {
    let n = match name {
        "enero" | "ene" => 1,
        "febrero" | "feb" => 2,
        "marzo" | "mar" => 3,
        "abril" | "abr" => 4,
        "mayo" | "may" => 5,
        "junio" | "jun" => 6,
        "julio" | "jul" => 7,
        "agosto" | "ago" => 8,
        "septiembre" | "setiembre" | "sep" => 9,
        "octubre" | "oct" => 10,
        "noviembre" | "nov" => 11,
        "diciembre" | "dic" => 12,
        _ => return None,
    };
    Some(n)
}

/// Resolve an optional month and pick the year so the result is the next
/// future occurrence relative to `today`.
///
/// The month defaults to `today`'s month. The year is `today`'s year unless
/// the month/day pair would land strictly before `today`, in which case it
/// rolls to the next year.
pub fn infer_year_and_month(day: u32, month: Option<u32>, today: NaiveDate) -> (i32, u32) {
    let month = month.unwrap_or(today.month());
    let mut year = today.year();
    if month < today.month() || (month == today.month() && day < today.day()) {
        year += 1;
    }
    (year, month)
}

type Matcher = fn(&str, NaiveDate) -> Vec<DateRange>;

/// Pattern families in priority order.
const FAMILIES: [Matcher; 3] = [match_explicit, match_numeric, match_relative];

/// Explicit sub-patterns in fixed order; the first one producing a range
/// returns immediately.
const EXPLICIT: [Matcher; 5] = [
    match_desde_with_nights,
    match_single_day,
    match_del_al,
    match_ir_del,
    match_first_week,
];

/// Parse every recognized date expression in `text` relative to `today`.
///
/// Returns an empty vector when nothing matches — an unrecognized
/// expression is a valid outcome, not an error.
pub fn parse_date_ranges(text: &str, today: NaiveDate) -> Vec<DateRange> {
    let t = normalize(text);
    FAMILIES
        .iter()
        .map(|family| family(&t, today))
        .find(|ranges| !ranges.is_empty())
        .unwrap_or_default()
}

// ── Explicit day/month-name family ──────────────────────────────────────────

static DESDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:desde|a\s*partir\s*de)(?:\s+el)?\s+(\d{1,2})(?:ro|do|er|vo|to|st|nd|rd|th)?\s+(?:de\s+)?(\w+)\b",
    )
    .expect("DESDE_RE must compile")
});

static NIGHTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*noche(?:s)?").expect("NIGHTS_RE must compile"));

static EL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:el|disponible\s+el?)\s+(\d{1,2})(?:ro|do|er|vo|to)?\s+(?:de\s+)?(\w+)\b")
        .expect("EL_RE must compile")
});

static DEL_AL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:del|desde)\s+(\d{1,2})\s+(?:al|hasta)\s+(?:el\s+)?(\d{1,2})\s*(?:de\s+)?(\w+)?\b")
        .expect("DEL_AL_RE must compile")
});

static IR_DEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bir\s+del\s+(\d{1,2})\s+(?:de\s+)?(\w+)\s+al\s+(\d{1,2})\b")
        .expect("IR_DEL_RE must compile")
});

static FIRST_WEEK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:primer|primera)\s+semana\s+(?:de\s+)?(\w+)\b")
        .expect("FIRST_WEEK_RE must compile")
});

fn match_explicit(t: &str, today: NaiveDate) -> Vec<DateRange> {
    EXPLICIT
        .iter()
        .map(|sub| sub(t, today))
        .find(|ranges| !ranges.is_empty())
        .unwrap_or_default()
}

/// "desde / a partir de [el] D [de] MES", optionally "N noche(s)" elsewhere
/// in the message; N defaults to a single night.
fn match_desde_with_nights(t: &str, today: NaiveDate) -> Vec<DateRange> {
    let Some(caps) = DESDE_RE.captures(t) else {
        return Vec::new();
    };
    let Ok(day) = caps[1].parse::<u32>() else {
        return Vec::new();
    };
    let Some(month) = month_number(&caps[2]) else {
        return Vec::new();
    };
    let (year, month) = infer_year_and_month(day, Some(month), today);
    let Some(checkin) = NaiveDate::from_ymd_opt(year, month, day) else {
        return Vec::new();
    };
    let nights = NIGHTS_RE
        .captures(t)
        .and_then(|c| c[1].parse::<i64>().ok())
        .unwrap_or(1);
    match checkin.checked_add_signed(Duration::days(nights)) {
        Some(checkout) => vec![DateRange { checkin, checkout }],
        None => Vec::new(),
    }
}

/// "el / disponible el D [de] MES" — a single-night stay.
fn match_single_day(t: &str, today: NaiveDate) -> Vec<DateRange> {
    let Some(caps) = EL_RE.captures(t) else {
        return Vec::new();
    };
    let Ok(day) = caps[1].parse::<u32>() else {
        return Vec::new();
    };
    let Some(month) = month_number(&caps[2]) else {
        return Vec::new();
    };
    let (year, month) = infer_year_and_month(day, Some(month), today);
    let Some(checkin) = NaiveDate::from_ymd_opt(year, month, day) else {
        return Vec::new();
    };
    match checkin.succ_opt() {
        Some(checkout) => vec![DateRange { checkin, checkout }],
        None => Vec::new(),
    }
}

/// "del/desde D1 al/hasta [el] D2 [de MES]" — both days in the same month.
/// The month is optional and defaults to the reference month; an unknown
/// month word falls back to the same default.
fn match_del_al(t: &str, today: NaiveDate) -> Vec<DateRange> {
    let Some(caps) = DEL_AL_RE.captures(t) else {
        return Vec::new();
    };
    let (Ok(day1), Ok(day2)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
        return Vec::new();
    };
    let month = caps.get(3).and_then(|m| month_number(m.as_str()));
    let (year, month) = infer_year_and_month(day1, month, today);
    let (Some(checkin), Some(checkout)) = (
        NaiveDate::from_ymd_opt(year, month, day1),
        NaiveDate::from_ymd_opt(year, month, day2),
    ) else {
        return Vec::new();
    };
    if checkout > checkin {
        vec![DateRange { checkin, checkout }]
    } else {
        Vec::new()
    }
}

/// "ir del D1 [de] MES al D2".
fn match_ir_del(t: &str, today: NaiveDate) -> Vec<DateRange> {
    let Some(caps) = IR_DEL_RE.captures(t) else {
        return Vec::new();
    };
    let Ok(day1) = caps[1].parse::<u32>() else {
        return Vec::new();
    };
    let Some(month) = month_number(&caps[2]) else {
        return Vec::new();
    };
    let Ok(day2) = caps[3].parse::<u32>() else {
        return Vec::new();
    };
    let (year, month) = infer_year_and_month(day1, Some(month), today);
    let (Some(checkin), Some(checkout)) = (
        NaiveDate::from_ymd_opt(year, month, day1),
        NaiveDate::from_ymd_opt(year, month, day2),
    ) else {
        return Vec::new();
    };
    if checkout > checkin {
        vec![DateRange { checkin, checkout }]
    } else {
        Vec::new()
    }
}

/// "primer(a) semana [de] MES" — the fixed `[1, 7)` window of that month.
fn match_first_week(t: &str, today: NaiveDate) -> Vec<DateRange> {
    let Some(caps) = FIRST_WEEK_RE.captures(t) else {
        return Vec::new();
    };
    let Some(month) = month_number(&caps[1]) else {
        return Vec::new();
    };
    let year = if month >= today.month() {
        today.year()
    } else {
        today.year() + 1
    };
    let (Some(checkin), Some(checkout)) = (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(year, month, 7),
    ) else {
        return Vec::new();
    };
    vec![DateRange { checkin, checkout }]
}

// ── Numeric family ──────────────────────────────────────────────────────────

static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/\-](\d{1,2})\b").expect("NUMERIC_RE must compile"));

/// Day-first "D/M" or "D-M" mentions. One valid date makes a single-night
/// stay; two or more are treated as unordered checkin/checkout endpoints
/// and span the earliest to the latest.
fn match_numeric(t: &str, today: NaiveDate) -> Vec<DateRange> {
    let mut found: Vec<NaiveDate> = Vec::new();
    for caps in NUMERIC_RE.captures_iter(t) {
        let (Ok(day), Ok(month)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            continue;
        }
        let (year, month) = infer_year_and_month(day, Some(month), today);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            found.push(date);
        }
    }

    if found.len() == 1 {
        return match found[0].succ_opt() {
            Some(checkout) => vec![DateRange {
                checkin: found[0],
                checkout,
            }],
            None => Vec::new(),
        };
    }
    if found.len() >= 2 {
        found.sort();
        return vec![DateRange {
            checkin: found[0],
            checkout: found[found.len() - 1],
        }];
    }
    Vec::new()
}

// ── Relative family ─────────────────────────────────────────────────────────

static WEEKEND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:el\s+)?fin(?:de)?(?:\s+de\s+semana)?(?:\s+que\s+viene|\s+proximo)?\b")
        .expect("WEEKEND_RE must compile")
});

static NEXT_WEEK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:la\s+)?semana\s+que\s+viene\b").expect("NEXT_WEEK_RE must compile")
});

static WEEKDAY_RES: Lazy<Vec<(Regex, u32)>> = Lazy::new(|| {
    WEEKDAY_NAMES
        .iter()
        .map(|(name, num)| {
            let re = Regex::new(&format!(r"\b{name}\s+que\s+viene\b"))
                .expect("weekday pattern must compile");
            (re, *num)
        })
        .collect()
});

/// Days from `today` until the next occurrence of `target` (Monday = 0),
/// never zero: "que viene" always means a future day, so landing on today
/// rolls a full week ahead.
fn days_until_next(target: u32, today: NaiveDate) -> i64 {
    let ahead = (target + 7 - today.weekday().num_days_from_monday()) % 7;
    if ahead == 0 {
        7
    } else {
        i64::from(ahead)
    }
}

fn match_relative(t: &str, today: NaiveDate) -> Vec<DateRange> {
    // Weekend: next Friday through Sunday.
    if WEEKEND_RE.is_match(t) {
        let checkin = today + Duration::days(days_until_next(4, today));
        return vec![DateRange {
            checkin,
            checkout: checkin + Duration::days(2),
        }];
    }

    // Next week: next Monday, two nights.
    if NEXT_WEEK_RE.is_match(t) {
        let checkin = today + Duration::days(days_until_next(0, today));
        return vec![DateRange {
            checkin,
            checkout: checkin + Duration::days(2),
        }];
    }

    // A named weekday, one night.
    for (re, weekday) in WEEKDAY_RES.iter() {
        if re.is_match(t) {
            let checkin = today + Duration::days(days_until_next(*weekday, today));
            return vec![DateRange {
                checkin,
                checkout: checkin + Duration::days(1),
            }];
        }
    }

    Vec::new()
}
