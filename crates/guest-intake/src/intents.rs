//! Multi-label intent classification over the keyword catalogues.
//!
//! Unlike the date parser's first-match cascade, every rule here is
//! evaluated — a single message can ask about availability, wifi and the
//! cancellation policy at once. Two deliberate policies shape the result:
//!
//! - **implicit availability**: a message carrying dates and no other
//!   recognized topic is treated as an availability question;
//! - **pricing/availability exclusion**: a message carrying concrete dates
//!   is never labeled `Pricing` — the dates make it an availability
//!   question, not a price-only one.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Topics a guest message can address.
///
/// A message maps to a set of these, never empty — [`Intent::Other`] is the
/// fallback when nothing else matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Availability,
    Pricing,
    Amenities,
    Checkin,
    Checkout,
    Recommendations,
    Policy,
    Other,
}

impl Intent {
    /// Stable lower-case label, as used in collaborator payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Availability => "availability",
            Intent::Pricing => "pricing",
            Intent::Amenities => "amenities",
            Intent::Checkin => "checkin",
            Intent::Checkout => "checkout",
            Intent::Recommendations => "recommendations",
            Intent::Policy => "policy",
            Intent::Other => "other",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("intent pattern must compile"))
        .collect()
}

fn any_match(patterns: &[Regex], t: &str) -> bool {
    patterns.iter().any(|re| re.is_match(t))
}

static AMENITIES: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\bgym\b",
        r"\bgimnasio\b",
        r"\bwifi\b",
        r"\bwi\s*fi\b",
        r"\btoalla(?:s)?\b",
        r"\bsabana(?:s)?\b",
        r"\bcocina\b",
        r"\bpileta\b",
        r"\bpiscina\b",
        r"\bair(?:e)?\s*acondicionado\b",
        r"\bcalefaccion\b",
        r"\bestacionamiento\b",
        r"\bgarage\b",
        r"\bamenities\b",
        r"\bservicios\b",
        r"\bequipamiento\b",
    ])
});

static AVAILABILITY: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\bdisponibl(?:e|idad)\b",
        r"\breserv(?:ar|a|as)?\b",
        r"\bhay\s+lugar\b",
        r"\blibre\b",
        r"\bpuedo\s+(?:reservar|ir)\b",
        r"\besta\s+(?:disponible|libre)\b",
    ])
});

static PRICING: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\bprecio(?:s)?\b",
        r"\btarifa(?:s)?\b",
        r"\bcosto(?:s)?\b",
        r"\bcuanto\s+(?:cuesta|sale|es)\b",
        r"\bvalor\b",
    ])
});

static CHECKIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bcheck\s*in\b|\bingreso\b|\bllegada\b").expect("CHECKIN must compile")
});

static CHECKOUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bcheck\s*out\b|\bsalida\b|\begreso\b").expect("CHECKOUT must compile")
});

static RECOMMENDATIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\brecomendacion(?:es)?\b|\bdonde\s+comer\b|\bque\s+hacer\b")
        .expect("RECOMMENDATIONS must compile")
});

static POLICY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bcancelacion\b|\bnorma(?:s)?\b|\bpolitica(?:s)?\b").expect("POLICY must compile")
});

/// Classify `text` into every intent it addresses.
///
/// `has_dates` is whether the date parser found a concrete range in the
/// same message; it gates both availability (only meaningful with dates)
/// and pricing (suppressed when dates are present).
pub fn classify_intents(text: &str, has_dates: bool) -> BTreeSet<Intent> {
    let t = normalize(text);
    let mut intents = BTreeSet::new();

    if any_match(&AMENITIES, &t) {
        intents.insert(Intent::Amenities);
    }

    if has_dates {
        if any_match(&AVAILABILITY, &t) {
            intents.insert(Intent::Availability);
        }
        // Implicit-availability policy: dates with no other discernible
        // topic imply an availability question.
        if intents.is_empty() {
            intents.insert(Intent::Availability);
        }
    } else if any_match(&PRICING, &t) {
        // Pricing/availability exclusion policy: pricing is only
        // considered for messages without dates.
        intents.insert(Intent::Pricing);
    }

    if CHECKIN.is_match(&t) {
        intents.insert(Intent::Checkin);
    }
    if CHECKOUT.is_match(&t) {
        intents.insert(Intent::Checkout);
    }
    if RECOMMENDATIONS.is_match(&t) {
        intents.insert(Intent::Recommendations);
    }
    if POLICY.is_match(&t) {
        intents.insert(Intent::Policy);
    }

    if intents.is_empty() {
        intents.insert(Intent::Other);
    }

    intents
}
