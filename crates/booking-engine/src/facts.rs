//! Verified facts — ground truth handed to draft generation and validation.

use std::fmt;

use serde::Serialize;

use crate::availability::{Availability, AvailabilityVerdict};

/// Polarity of a verified availability conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactPolarity {
    ConfirmedAvailable,
    ConfirmedUnavailable,
}

/// An availability conclusion derived from live calendar reconciliation,
/// treated as ground truth while validating generated prose.
///
/// Created per request, consumed once by the validator, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedFact {
    pub polarity: FactPolarity,
    /// The human-readable sentence the conclusion was derived from.
    pub detail: String,
}

impl VerifiedFact {
    /// Derive the fact for a verdict. An unknown availability state yields
    /// no fact at all — nothing was verified.
    pub fn from_verdict(verdict: &AvailabilityVerdict) -> Option<Self> {
        let polarity = match verdict.availability {
            Availability::Available => FactPolarity::ConfirmedAvailable,
            Availability::Unavailable => FactPolarity::ConfirmedUnavailable,
            Availability::Unknown { .. } => return None,
        };
        Some(VerifiedFact {
            polarity,
            detail: verdict.detail.clone(),
        })
    }
}

impl fmt::Display for VerifiedFact {
    /// The tagged fact string fed to the draft generator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[VERIFICADO_ICAL] {}", self.detail)
    }
}
