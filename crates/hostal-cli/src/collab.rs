//! File-backed collaborators for the CLI.
//!
//! The real deployment wires an embedding retriever and an LLM generator
//! behind these traits; the CLI ships deterministic stand-ins so the whole
//! pipeline runs offline and its output is reproducible.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use booking_engine::{
    ContextRetriever, ContextSnippet, DraftGenerator, DraftPayload, DraftRequest,
};
use guest_intake::{normalize, Intent};

#[derive(Debug, Deserialize)]
struct KbEntry {
    text: String,
    section: String,
    property_id: String,
}

/// Token-overlap retriever over a JSON snippet file
/// (`[{text, section, property_id}, ...]`).
pub struct FileKb {
    entries: Vec<KbEntry>,
}

impl FileKb {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read knowledge base: {}", path.display()))?;
        let entries =
            serde_json::from_str(&raw).context("Knowledge base is not a JSON snippet array")?;
        Ok(FileKb { entries })
    }

    /// Empty knowledge base — retrieval returns nothing.
    pub fn empty() -> Self {
        FileKb {
            entries: Vec::new(),
        }
    }
}

/// Alphanumeric tokens of the normalized text; punctuation never counts.
fn tokens(text: &str) -> BTreeSet<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Crude lexical relevance: the fraction of query tokens present in the
/// snippet text.
fn overlap_score(query_tokens: &BTreeSet<String>, text: &str) -> f32 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let text_tokens = tokens(text);
    let hits = query_tokens
        .iter()
        .filter(|tok| text_tokens.contains(*tok))
        .count();
    hits as f32 / query_tokens.len() as f32
}

impl ContextRetriever for FileKb {
    fn retrieve(
        &self,
        query: &str,
        k: usize,
        property_filter: Option<&str>,
    ) -> Vec<ContextSnippet> {
        let query_tokens = tokens(query);

        let mut scored: Vec<ContextSnippet> = self
            .entries
            .iter()
            .filter(|e| property_filter.is_none_or(|p| e.property_id == p))
            .map(|e| ContextSnippet {
                text: e.text.clone(),
                section: e.section.clone(),
                property_id: e.property_id.clone(),
                relevance_score: overlap_score(&query_tokens, &e.text),
            })
            .filter(|s| s.relevance_score > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }
}

/// Deterministic draft generator: assembles the reply from verified facts,
/// the detected intents and the top context snippets.
///
/// Stands in for the LLM collaborator; its output still goes through the
/// same consistency gate as any other generator's.
pub struct TemplateGenerator;

impl DraftGenerator for TemplateGenerator {
    fn generate(&self, request: &DraftRequest<'_>) -> anyhow::Result<DraftPayload> {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut citations: Vec<String> = Vec::new();

        for fact in request.facts {
            let detail = fact.strip_prefix("[VERIFICADO_ICAL] ").unwrap_or(fact);
            paragraphs.push(format!("Respecto a la disponibilidad: {detail}"));
            citations.push("ical".to_string());
        }

        for snippet in request.context.iter().take(2) {
            paragraphs.push(snippet.text.clone());
            citations.push(snippet.section.clone());
        }

        if paragraphs.is_empty() {
            paragraphs.push(
                "Gracias por tu consulta. Estamos revisando tu mensaje y te respondemos a la \
                 brevedad."
                    .to_string(),
            );
        }

        let draft = format!(
            "{}\n\nSaludos,\n{}",
            paragraphs.join("\n\n"),
            request.signature
        );

        Ok(DraftPayload {
            intent: request
                .intents
                .iter()
                .map(Intent::as_str)
                .collect::<Vec<_>>()
                .join(","),
            dates: Vec::new(),
            draft,
            citations,
            language: "es".to_string(),
        })
    }
}
