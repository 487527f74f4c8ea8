//! Maps the analyzer output onto the single best policy document: intent
//! precedence first, then exact letter/id match, then a weighted lexical
//! score over the whole catalog.

use permia_core::{Catalog, PermitCode, PolicyDocument};
use tracing::debug;

use crate::semantics::SemanticAnalysis;
use crate::text::normalize;

/// Legal precedence of intent codes: major procedures and bereavement first,
/// the routine family bag last. `L` is listed for catalogs that carry it even
/// though no lexical rule emits it.
const BASE_PRIORITY: [PermitCode; 13] = [
    PermitCode::A,
    PermitCode::B,
    PermitCode::D,
    PermitCode::K,
    PermitCode::F,
    PermitCode::G,
    PermitCode::H,
    PermitCode::M,
    PermitCode::C,
    PermitCode::E,
    PermitCode::I,
    PermitCode::L,
    PermitCode::N,
];

pub struct ContextRetriever<'a> {
    catalog: &'a Catalog,
}

impl<'a> ContextRetriever<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn retrieve(
        &self,
        query: &str,
        analysis: &SemanticAnalysis,
    ) -> Option<&'a PolicyDocument> {
        if analysis.permit_intents().next().is_some() {
            if let Some(document) = self.by_intent_precedence(analysis) {
                return Some(document);
            }
            // An E-first self query may have returned None above when the
            // catalog lacks E; in that case the walk already ran, so fall
            // through to the remaining strategies.
        }

        let q = normalize(query);
        if let Some(document) = self.catalog.by_letter_or_id(&q) {
            return Some(document);
        }

        self.by_hybrid_score(&q, analysis)
    }

    fn by_intent_precedence(&self, analysis: &SemanticAnalysis) -> Option<&'a PolicyDocument> {
        // Self-care takes absolute precedence when the requester is the
        // subject, even over higher-priority matches.
        if analysis.flags.is_self && analysis.has_permit(PermitCode::E) {
            return self.catalog.by_id(PermitCode::E);
        }

        let mut order: Vec<PermitCode> = BASE_PRIORITY.to_vec();
        if !analysis.flags.is_self {
            // Third-party queries should prefer family/specialist categories
            // over the requester's own-appointment permit.
            order.retain(|code| *code != PermitCode::E);
            order.push(PermitCode::E);
        }

        for code in order {
            if analysis.has_permit(code) {
                if let Some(document) = self.catalog.by_id(code) {
                    return Some(document);
                }
            }
        }
        None
    }

    fn by_hybrid_score(
        &self,
        q: &str,
        analysis: &SemanticAnalysis,
    ) -> Option<&'a PolicyDocument> {
        let flags = analysis.flags;
        let mut best: Option<(&'a PolicyDocument, u32)> = None;

        for document in self.catalog.iter() {
            let mut score = 0u32;
            let title = normalize(&document.title);
            let coverage = normalize(&document.summary.coverage);

            if title.contains(q) {
                score += 30;
            }
            if coverage.contains(q) {
                score += 10;
            }
            // Safety net: intent hits normally resolve in the precedence walk.
            if analysis.has_permit(document.id) {
                score += 50;
            }
            if flags.is_self && document.id == PermitCode::E {
                score += 20;
            }
            if !flags.is_self
                && (document.id == PermitCode::N || document.id == PermitCode::K)
            {
                score += 10;
            }
            if flags.is_cohabiting
                && (document.id == PermitCode::A || document.id == PermitCode::N)
            {
                score += 40;
            }
            if document.faq.iter().any(|entry| {
                normalize(&entry.question).contains(q) || normalize(&entry.answer).contains(q)
            }) {
                score += 5;
            }
            if title.split(' ').any(|word| word.len() > 3 && q.contains(word)) {
                score += 5;
            }

            if score > 0 && best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((document, score));
            }
        }

        if let Some((document, score)) = best {
            debug!(permit = %document.id, score, "hybrid scoring selected document");
        }
        best.map(|(document, _)| document)
    }
}
