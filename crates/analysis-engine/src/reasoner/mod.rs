//! Four-pass entity reasoner.
//!
//! Pass 1 scans the pattern tables for candidates, pass 2 promotes or
//! rejects them on corroborating evidence, pass 3 votes on the document
//! type and builds the event timeline, pass 4 calibrates an interim
//! confidence picture. Every pass writes one reasoning chain.

mod calibration;
mod extraction;
mod legal;
mod validation;

pub use calibration::CalibrationSummary;
pub use validation::DEFAULT_EVIDENCE_THRESHOLD;

use chrono::NaiveDate;
use shared_types::{
    DocumentContext, DocumentType, ExtractedEntity, ReasoningChain, TimelineEntry,
};
use tracing::debug;

use crate::dictionary::PhraseDictionary;
use crate::EngineConfig;

/// Number of leading lines treated as the document header for evidence
/// scoring and document-date detection.
const HEADER_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct ReasonerOutput {
    pub entities: Vec<ExtractedEntity>,
    pub document_type: DocumentType,
    pub timeline: Vec<TimelineEntry>,
    pub calibration: CalibrationSummary,
    pub chains: Vec<ReasoningChain>,
}

pub fn run(
    text: &str,
    context: &DocumentContext,
    dictionary: &PhraseDictionary,
    today: NaiveDate,
    config: &EngineConfig,
) -> ReasonerOutput {
    let header_len = header_byte_len(text);

    let mut pass1 = ReasoningChain::new("extraction");
    let candidates = extraction::extract_candidates(text, &mut pass1);
    debug!(candidates = candidates.len(), "extraction pass complete");

    let mut pass2 = ReasoningChain::new("validation");
    let entities = validation::validate_candidates(
        text,
        header_len,
        candidates,
        today,
        config.evidence_threshold,
        &mut pass2,
    );
    debug!(entities = entities.len(), "validation pass complete");

    let mut pass3 = ReasoningChain::new("legal_classification");
    let (document_type, type_score) =
        legal::classify_document(text, context, dictionary, &mut pass3);
    let timeline = legal::build_timeline(text, &entities, header_len, &mut pass3);

    let mut pass4 = ReasoningChain::new("calibration");
    let calibration = calibration::calibrate(
        &entities,
        document_type,
        type_score,
        &timeline,
        context,
        &mut pass4,
    );

    ReasonerOutput {
        entities,
        document_type,
        timeline,
        calibration,
        chains: vec![pass1, pass2, pass3, pass4],
    }
}

fn header_byte_len(text: &str) -> usize {
    let mut remaining = HEADER_LINES;
    for (idx, b) in text.bytes().enumerate() {
        if b == b'\n' {
            remaining -= 1;
            if remaining == 0 {
                return idx + 1;
            }
        }
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn header_length_covers_the_first_twenty_lines() {
        let text = "line\n".repeat(30);
        assert_eq!(header_byte_len(&text), 5 * 20);
        assert_eq!(header_byte_len("short text"), 10);
    }

    #[test]
    fn all_four_passes_log_a_chain() {
        let text = "EVICTION NOTICE\n\nDated: March 1, 2024\n\nDear John Smith,\n\n\
                    Your monthly rent of $1,200.00 is past due. You must vacate \
                    the premises at 123 Oak Street, Minneapolis, MN 55401 within \
                    14 days pursuant to Minn. Stat. 504B.291.";
        let dictionary = PhraseDictionary::new();
        let context = crate::context::analyze_context(text, 80.0);
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let output = run(text, &context, &dictionary, today, &EngineConfig::default());

        let names: Vec<&str> = output.chains.iter().map(|c| c.pass_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["extraction", "validation", "legal_classification", "calibration"]
        );
        assert!(output.chains.iter().all(|c| !c.steps.is_empty()));
        assert!(!output.entities.is_empty());
        assert_ne!(output.document_type, DocumentType::Unknown);
    }

    #[test]
    fn reruns_are_identical() {
        let text = "NOTICE TO VACATE\n\nTenant: Maria Santos\nRent due: $950.00\n\
                    You must vacate by April 30, 2024.";
        let dictionary = PhraseDictionary::new();
        let context = crate::context::analyze_context(text, 75.0);
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let config = EngineConfig::default();
        let a = run(text, &context, &dictionary, today, &config);
        let b = run(text, &context, &dictionary, today, &config);
        assert_eq!(a.entities, b.entities);
        assert_eq!(a.timeline, b.timeline);
        assert_eq!(a.document_type, b.document_type);
    }
}
