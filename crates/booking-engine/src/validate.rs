//! Draft/fact consistency validation and deterministic repair.
//!
//! A generated draft is checked against the verified facts and the
//! requested intents: it must not contradict a confirmed availability
//! polarity, and it must say something about each topic the guest asked
//! about. Any failure discards the draft entirely and synthesizes a
//! replacement from fixed templates — never another model call.

use std::collections::BTreeSet;

use guest_intake::{normalize, Intent};
use serde::Serialize;

use crate::facts::{FactPolarity, VerifiedFact};

/// Negative-availability phrasing scanned for in normalized drafts.
const NEGATIVE_PHRASES: [&str; 8] = [
    "no esta disponible",
    "no disponible",
    "no hay disponibilidad",
    "ocupadas",
    "ocupada",
    "reservadas",
    "reservada",
    "lamento",
];

/// Positive-availability phrasing.
const POSITIVE_PHRASES: [&str; 6] = [
    "disponible",
    "libre",
    "confirmo",
    "confirmamos",
    "esta libre",
    "hay lugar",
];

/// Words that count as addressing an amenities question.
const AMENITY_WORDS: [&str; 9] = [
    "wifi",
    "gym",
    "gimnasio",
    "pileta",
    "piscina",
    "toallas",
    "cocina",
    "calefacci",
    "aire",
];

/// Words that count as addressing a pricing question.
const PRICING_WORDS: [&str; 6] = ["precio", "tarifa", "costo", "necesit", "fechas", "cotiz"];

/// A detected inconsistency between draft, facts and intents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "issue", content = "intent")]
pub enum ConsistencyIssue {
    /// Fact says available, draft reads as a refusal.
    AvailableFactContradicted,
    /// Fact says unavailable, draft reads as a confirmation.
    UnavailableFactContradicted,
    /// The guest asked about this topic and the draft never mentions it.
    UncoveredIntent(Intent),
}

/// Validation outcome; `corrected` is present exactly when invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub is_valid: bool,
    pub issues: Vec<ConsistencyIssue>,
    pub corrected: Option<String>,
}

impl Validation {
    fn valid() -> Self {
        Validation {
            is_valid: true,
            issues: Vec::new(),
            corrected: None,
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Validate `draft` against the verified facts and the requested intents.
///
/// An empty draft or an empty intent set validates trivially — there is
/// nothing to check against. The synthesized correction replaces the draft
/// in full; `signature` closes it.
pub fn validate_draft(
    draft: &str,
    facts: &[VerifiedFact],
    intents: &BTreeSet<Intent>,
    signature: &str,
) -> Validation {
    if draft.is_empty() || intents.is_empty() {
        return Validation::valid();
    }

    let t = normalize(draft);
    let mut issues = Vec::new();

    // Availability contradictions, only meaningful when something was
    // actually verified and the guest asked about availability.
    if !facts.is_empty() && intents.contains(&Intent::Availability) {
        let has_available = facts
            .iter()
            .any(|f| f.polarity == FactPolarity::ConfirmedAvailable);
        let has_unavailable = facts
            .iter()
            .any(|f| f.polarity == FactPolarity::ConfirmedUnavailable);

        let says_unavailable = contains_any(&t, &NEGATIVE_PHRASES);
        // Positive phrasing must stand on its own: "disponible" inside
        // "no esta disponible" is not a confirmation. Mask the negative
        // phrases out before scanning for positives.
        let mut positives_view = t.clone();
        for phrase in NEGATIVE_PHRASES {
            positives_view = positives_view.replace(phrase, " ");
        }
        let says_available = contains_any(&positives_view, &POSITIVE_PHRASES);

        if has_available && says_unavailable && !says_available {
            issues.push(ConsistencyIssue::AvailableFactContradicted);
        }
        if has_unavailable && says_available && !says_unavailable {
            issues.push(ConsistencyIssue::UnavailableFactContradicted);
        }
    }

    if intents.contains(&Intent::Amenities) && !contains_any(&t, &AMENITY_WORDS) {
        issues.push(ConsistencyIssue::UncoveredIntent(Intent::Amenities));
    }
    if intents.contains(&Intent::Pricing) && !contains_any(&t, &PRICING_WORDS) {
        issues.push(ConsistencyIssue::UncoveredIntent(Intent::Pricing));
    }

    if issues.is_empty() {
        return Validation::valid();
    }

    let corrected = render_correction(&issues, facts, intents, signature);
    Validation {
        is_valid: false,
        issues,
        corrected: Some(corrected),
    }
}

/// Build the replacement draft from fixed templates — a pure function of
/// the issues, facts and intents, so outputs are golden-testable.
fn render_correction(
    issues: &[ConsistencyIssue],
    facts: &[VerifiedFact],
    intents: &BTreeSet<Intent>,
    signature: &str,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if intents.contains(&Intent::Availability) {
        if let Some(fact) = facts.first() {
            parts.push(format!("Respecto a la disponibilidad: {}", fact.detail));
        }
    }
    if issues.contains(&ConsistencyIssue::UncoveredIntent(Intent::Amenities)) {
        parts.push(
            "En cuanto a las comodidades del lugar, necesito verificar esa informacion \
             especifica. Te respondo en breve."
                .to_string(),
        );
    }
    if issues.contains(&ConsistencyIssue::UncoveredIntent(Intent::Pricing)) {
        parts.push(
            "Para darte un precio exacto necesito confirmar fechas y cantidad de huespedes. \
             Me pasas esos datos?"
                .to_string(),
        );
    }

    format!("{}\n\nSaludos,\n{signature}", parts.join("\n\n"))
}
