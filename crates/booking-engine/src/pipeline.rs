//! Request pipeline — the strict per-message control flow.
//!
//! text → date parsing → intent classification → context retrieval →
//! availability evaluation → draft generation → consistency validation.
//! Retrieval and generation are collaborator traits supplied by the
//! caller; everything else is this workspace's own code. Every invocation
//! is an independent pure pass over its inputs — no cross-request state.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use guest_intake::{classify_intents, parse_date_ranges, DateRange, Intent};

use crate::availability::{evaluate, AvailabilityVerdict, Rejection};
use crate::calendar::CalendarSource;
use crate::facts::VerifiedFact;
use crate::validate::validate_draft;

/// How many context snippets the retriever is asked for.
const CONTEXT_K: usize = 6;

/// Citation prepended when the validator replaced the draft.
const CORRECTED_CITATION: &str = "Respuesta corregida por inconsistencias detectadas";

fn fallback_draft(signature: &str) -> String {
    format!(
        "Disculpa, hubo un error tecnico. Podrias reformular tu consulta?\n\nSaludos,\n{signature}"
    )
}

/// One ranked knowledge-base snippet from the retrieval collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub text: String,
    pub section: String,
    pub property_id: String,
    pub relevance_score: f32,
}

/// Everything the draft-generation collaborator gets to see.
#[derive(Debug, Clone)]
pub struct DraftRequest<'a> {
    pub message: &'a str,
    pub property_id: Option<&'a str>,
    pub context: &'a [ContextSnippet],
    /// Rendered verified-fact strings ("[VERIFICADO_ICAL] ...").
    pub facts: &'a [String],
    pub intents: &'a BTreeSet<Intent>,
    pub signature: &'a str,
}

/// Structured payload the draft-generation collaborator returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPayload {
    pub intent: String,
    /// ISO-8601 dates the generator believes the message refers to.
    pub dates: Vec<String>,
    pub draft: String,
    pub citations: Vec<String>,
    pub language: String,
}

/// Retrieval collaborator: ranked context snippets for a query.
pub trait ContextRetriever {
    fn retrieve(&self, query: &str, k: usize, property_filter: Option<&str>)
        -> Vec<ContextSnippet>;
}

/// Draft-generation collaborator: an opaque black box whose output the
/// pipeline validates and may override.
pub trait DraftGenerator {
    fn generate(&self, request: &DraftRequest<'_>) -> anyhow::Result<DraftPayload>;
}

/// Final per-request output.
#[derive(Debug, Clone, Serialize)]
pub struct GuestReply {
    pub dates: Vec<DateRange>,
    pub intents: BTreeSet<Intent>,
    /// Present when the message carried dates; `Err` is the typed
    /// rejection reason, not a fault.
    pub verdict: Option<Result<AvailabilityVerdict, Rejection>>,
    pub draft: String,
    pub citations: Vec<String>,
    /// Whether the consistency validator replaced the generated draft.
    pub corrected: bool,
}

/// Run the full pipeline for one guest message.
///
/// The order is load-bearing: the classifier needs to know whether dates
/// parsed, and validation needs the verified facts the evaluator produced.
pub fn respond(
    message: &str,
    property_id: Option<&str>,
    source: Option<&dyn CalendarSource>,
    retriever: &dyn ContextRetriever,
    generator: &dyn DraftGenerator,
    today: NaiveDate,
    signature: &str,
) -> GuestReply {
    let dates = parse_date_ranges(message, today);
    let has_dates = !dates.is_empty();
    let intents = classify_intents(message, has_dates);
    debug!(?dates, ?intents, "message analyzed");

    let context = retriever.retrieve(message, CONTEXT_K, property_id);

    let verdict = has_dates.then(|| evaluate(message, property_id, source, today));

    let facts: Vec<VerifiedFact> = verdict
        .as_ref()
        .and_then(|v| v.as_ref().ok())
        .and_then(VerifiedFact::from_verdict)
        .into_iter()
        .collect();
    let fact_strings: Vec<String> = facts.iter().map(|f| f.to_string()).collect();

    let request = DraftRequest {
        message,
        property_id,
        context: &context,
        facts: &fact_strings,
        intents: &intents,
        signature,
    };

    let (mut draft, mut citations) = match generator.generate(&request) {
        Ok(payload) => (payload.draft, payload.citations),
        Err(err) => {
            warn!(error = %err, "draft generator failed, using fallback");
            (fallback_draft(signature), Vec::new())
        }
    };

    let validation = validate_draft(&draft, &facts, &intents, signature);
    let corrected = !validation.is_valid;
    if let Some(replacement) = validation.corrected {
        draft = replacement;
        citations.insert(0, CORRECTED_CITATION.to_string());
    }

    GuestReply {
        dates,
        intents,
        verdict,
        draft,
        citations,
        corrected,
    }
}
