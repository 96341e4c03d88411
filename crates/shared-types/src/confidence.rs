use serde::{Deserialize, Serialize};

/// Discretized confidence bucket for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    Certain,
    High,
    Medium,
    Low,
    Uncertain,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            ConfidenceLevel::Certain
        } else if score >= 75.0 {
            ConfidenceLevel::High
        } else if score >= 55.0 {
            ConfidenceLevel::Medium
        } else if score >= 35.0 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::Uncertain
        }
    }
}

/// Multi-factor confidence breakdown. Every dimension is 0–100;
/// `overall_score` is a convex combination of the dimensions, so it can
/// never exceed the largest of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceMetrics {
    pub text_quality: f64,
    pub structural_clarity: f64,
    pub entity_extraction: f64,
    pub document_type: f64,
    pub relationship: f64,
    pub legal_analysis: f64,
    pub temporal: f64,
    pub reasoning_agreement: f64,
    pub overall_score: f64,
    pub level: ConfidenceLevel,
    /// Free-text diagnostics for display; never drive computation.
    pub ambiguous_elements: Vec<String>,
    pub missing_information: Vec<String>,
    pub explanation: String,
}

impl ConfidenceMetrics {
    /// All-zero metrics, used as the floor when the pipeline degrades.
    pub fn floor(note: impl Into<String>) -> Self {
        Self {
            text_quality: 0.0,
            structural_clarity: 0.0,
            entity_extraction: 0.0,
            document_type: 0.0,
            relationship: 0.0,
            legal_analysis: 0.0,
            temporal: 0.0,
            reasoning_agreement: 0.0,
            overall_score: 10.0,
            level: ConfidenceLevel::Uncertain,
            ambiguous_elements: Vec::new(),
            missing_information: vec![note.into()],
            explanation: String::from("analysis degraded; minimal confidence floor applied"),
        }
    }

    pub fn dimensions(&self) -> [f64; 8] {
        [
            self.text_quality,
            self.structural_clarity,
            self.entity_extraction,
            self.document_type,
            self.relationship,
            self.legal_analysis,
            self.temporal,
            self.reasoning_agreement,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds_are_inclusive_at_the_bottom() {
        assert_eq!(ConfidenceLevel::from_score(90.0), ConfidenceLevel::Certain);
        assert_eq!(ConfidenceLevel::from_score(89.9), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(55.0), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(34.9), ConfidenceLevel::Uncertain);
    }
}
