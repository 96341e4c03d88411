//! Tenancy document analysis engine.
//!
//! Turns raw text from legal and tenancy documents into a structured,
//! confidence-scored [`DocumentAnalysis`]: document type, extracted
//! entities, legal issues, relationships, tone, handwriting risk, and a
//! multi-factor confidence report. The pipeline is pure string
//! processing; OCR, persistence, and transport belong to the caller.
//!
//! The engine never fails on document content. Malformed input degrades
//! the confidence score and adds warnings; a panic anywhere in the stage
//! pipeline is caught at this boundary and floored instead of propagated.

pub mod confidence;
pub mod context;
pub mod dictionary;
pub mod handwriting;
pub mod parse;
pub mod patterns;
pub mod preprocess;
pub mod reasoner;
pub mod relationships;
pub mod rules;
pub mod tone;

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use shared_types::{
    AnalysisInput, ConfidenceMetrics, DocumentAnalysis, DocumentContext, DocumentType,
    LegalAnalysis, RelationshipMap, ToneAnalysisResult,
};
use tracing::{debug, error};

use dictionary::PhraseDictionary;

/// Engine knobs, fixed at construction. Replaces ambient globals: the
/// same config always yields the same engine behavior.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Jurisdiction tag carried into result notes; the rule tables are
    /// Minnesota-specific regardless.
    pub jurisdiction: String,
    /// Scale factor in the entity promotion inequality.
    pub evidence_threshold: f64,
    /// Max byte gap for cross-type entity proximity links.
    pub proximity_radius: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            jurisdiction: "MN".to_string(),
            evidence_threshold: reasoner::DEFAULT_EVIDENCE_THRESHOLD,
            proximity_radius: relationships::DEFAULT_PROXIMITY_RADIUS,
        }
    }
}

/// The analysis pipeline plus its immutable dictionaries. Build once,
/// share freely: all per-document state lives in the call.
pub struct AnalysisEngine {
    dictionary: PhraseDictionary,
    config: EngineConfig,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            dictionary: PhraseDictionary::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze with "today" taken from the wall clock. Prefer
    /// [`Self::analyze_with_date`] anywhere determinism matters.
    pub fn analyze(&self, input: &AnalysisInput) -> DocumentAnalysis {
        self.analyze_with_date(input, chrono::Local::now().date_naive())
    }

    /// Analyze one document. `today` is the only wall-clock input; with
    /// it fixed, identical text yields identical results apart from
    /// `processing_time_ms`.
    pub fn analyze_with_date(&self, input: &AnalysisInput, today: NaiveDate) -> DocumentAnalysis {
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(input, today)));
        let mut analysis = match outcome {
            Ok(analysis) => analysis,
            Err(cause) => {
                let detail = cause
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| cause.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(%detail, "pipeline panicked; returning floored result");
                degraded_result(format!("internal analysis failure: {detail}"))
            }
        };
        analysis.processing_time_ms = started.elapsed().as_millis() as u64;
        analysis
    }

    /// Analyze a batch in parallel. Results come back in input order
    /// regardless of completion order.
    pub fn analyze_batch(&self, inputs: &[AnalysisInput]) -> Vec<DocumentAnalysis> {
        let today = chrono::Local::now().date_naive();
        self.analyze_batch_with_date(inputs, today)
    }

    pub fn analyze_batch_with_date(
        &self,
        inputs: &[AnalysisInput],
        today: NaiveDate,
    ) -> Vec<DocumentAnalysis> {
        inputs
            .par_iter()
            .map(|input| self.analyze_with_date(input, today))
            .collect()
    }

    fn run_pipeline(&self, input: &AnalysisInput, today: NaiveDate) -> DocumentAnalysis {
        let pre = preprocess::preprocess(&input.text);
        let mut warnings = pre.warnings.clone();
        let text = pre.text.as_str();
        debug!(
            filename = input.filename.as_deref().unwrap_or("<none>"),
            quality = pre.quality_score,
            corrections = pre.corrections.len(),
            "preprocessing complete"
        );

        let context = context::analyze_context(text, pre.quality_score);

        let reasoned = reasoner::run(text, &context, &self.dictionary, today, &self.config);
        let mut entities = reasoned.entities;
        let timeline = reasoned.timeline;
        let document_type = reasoned.document_type;

        let relationships =
            relationships::map_relationships(text, &mut entities, self.config.proximity_radius);

        let legal_analysis = rules::evaluate(
            text,
            document_type,
            &entities,
            &timeline,
            &relationships,
            today,
        );
        let tone_analysis = tone::analyze_tone(text);

        let handwriting = handwriting::analyze_handwriting(text, &entities, today);
        let handwriting_analysis = if handwriting.signatures.is_empty()
            && handwriting.handwritten_elements.is_empty()
            && handwriting.forgery_indicators.is_empty()
        {
            None
        } else {
            Some(handwriting)
        };

        let confidence = confidence::score(&confidence::ScoringInput {
            context: &context,
            document_type,
            type_score: reasoned.calibration.doc_type_score / 100.0,
            entities: &entities,
            relationships: &relationships,
            legal: &legal_analysis,
            timeline: &timeline,
            chains: &reasoned.chains,
        });

        let mut notes: Vec<String> = self
            .dictionary
            .identify_phrases(text)
            .into_iter()
            .map(|m| format!("contains \"{}\": {}", m.canonical, m.meaning))
            .collect();
        notes.push(format!("jurisdiction: {}", self.config.jurisdiction));
        warnings.extend(reasoned.calibration.weak_dimensions.iter().cloned());

        DocumentAnalysis {
            document_type,
            document_category: document_type.category(),
            normalized_text: pre.text,
            context,
            entities,
            timeline,
            legal_analysis,
            relationships,
            tone_analysis,
            handwriting_analysis,
            confidence,
            reasoning_chains: reasoned.chains,
            warnings,
            notes,
            processing_time_ms: 0,
        }
    }
}

fn degraded_result(warning: String) -> DocumentAnalysis {
    DocumentAnalysis {
        document_type: DocumentType::Unknown,
        document_category: DocumentType::Unknown.category(),
        normalized_text: String::new(),
        context: DocumentContext::empty(),
        entities: Vec::new(),
        timeline: Vec::new(),
        legal_analysis: LegalAnalysis::empty(),
        relationships: RelationshipMap::empty(),
        tone_analysis: ToneAnalysisResult::neutral(),
        handwriting_analysis: None,
        confidence: ConfidenceMetrics::floor(&warning),
        reasoning_chains: Vec::new(),
        warnings: vec![warning],
        notes: Vec::new(),
        processing_time_ms: 0,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shared_types::ConfidenceLevel;

    use super::*;

    #[test]
    fn empty_text_degrades_instead_of_failing() {
        let engine = AnalysisEngine::new();
        let result = engine.analyze_with_date(
            &AnalysisInput::from_text("   \n  "),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        assert_eq!(result.document_type, DocumentType::Unknown);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("empty or whitespace-only")));
        assert_eq!(result.confidence.level, ConfidenceLevel::Uncertain);
    }

    #[test]
    fn batch_results_keep_input_order() {
        let engine = AnalysisEngine::new();
        let inputs = vec![
            AnalysisInput::from_text("NOTICE TO VACATE: you must vacate within 30 days."),
            AnalysisInput::from_text("Some random text"),
            AnalysisInput::from_text("SUMMONS: appear before the district court."),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let batch = engine.analyze_batch_with_date(&inputs, today);
        assert_eq!(batch.len(), 3);
        let singles: Vec<DocumentAnalysis> = inputs
            .iter()
            .map(|i| engine.analyze_with_date(i, today))
            .collect();
        for (b, s) in batch.iter().zip(&singles) {
            assert_eq!(b.document_type, s.document_type);
            assert_eq!(b.entities, s.entities);
        }
    }
}
