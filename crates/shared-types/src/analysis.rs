use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceMetrics;
use crate::document::{DocumentCategory, DocumentContext, DocumentType};
use crate::entity::ExtractedEntity;
use crate::handwriting::HandwritingAnalysisResult;
use crate::issue::LegalAnalysis;
use crate::reasoning::ReasoningChain;
use crate::relationships::RelationshipMap;
use crate::timeline::TimelineEntry;
use crate::tone::ToneAnalysisResult;

/// Input contract: plain text plus optional hints. Text is assumed to be
/// already OCR'd/extracted; this core does no file handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl AnalysisInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// The complete, serializable result of one analysis run.
///
/// Entity spans index into `normalized_text`, not the raw input, since
/// extraction runs after OCR correction and whitespace normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub document_type: DocumentType,
    pub document_category: DocumentCategory,
    pub normalized_text: String,
    pub context: DocumentContext,
    pub entities: Vec<ExtractedEntity>,
    pub timeline: Vec<TimelineEntry>,
    pub legal_analysis: LegalAnalysis,
    pub relationships: RelationshipMap,
    pub tone_analysis: ToneAnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handwriting_analysis: Option<HandwritingAnalysisResult>,
    pub confidence: ConfidenceMetrics,
    pub reasoning_chains: Vec<ReasoningChain>,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
    /// Wall-clock duration; excluded from determinism comparisons.
    pub processing_time_ms: u64,
}

impl DocumentAnalysis {
    pub fn entity(&self, id: &str) -> Option<&ExtractedEntity> {
        self.entities.iter().find(|e| e.id == id)
    }
}
