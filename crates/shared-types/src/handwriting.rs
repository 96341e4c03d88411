use serde::{Deserialize, Serialize};

use crate::entity::TextSpan;

/// Risk buckets for forgery indicators and the aggregate score.
/// Declaration order is the comparison order: `Low < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Weight used when aggregating indicators into the overall score.
    pub fn weight(&self) -> f64 {
        match self {
            RiskLevel::Low => 10.0,
            RiskLevel::Medium => 25.0,
            RiskLevel::High => 45.0,
            RiskLevel::Critical => 70.0,
        }
    }

    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            RiskLevel::Critical
        } else if score >= 50.0 {
            RiskLevel::High
        } else if score >= 25.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureKind {
    SignatureLine,
    Electronic,
    Witness,
    Notary,
    Initials,
}

/// One signature found in the text, with a deterministic content hash
/// used for exact-duplicate detection (not a cryptographic attestation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureProfile {
    pub kind: SignatureKind,
    /// The signer text as written, trimmed.
    pub value: String,
    pub span: TextSpan,
    /// Hex SHA-256 of the normalized signature value.
    pub content_hash: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandwrittenKind {
    Date,
    Amount,
    Initials,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandwrittenElement {
    pub kind: HandwrittenKind,
    pub value: String,
    pub span: TextSpan,
}

/// Closed taxonomy of forgery indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForgeryType {
    FutureDated,
    InconsistentDates,
    AmountMismatch,
    DuplicateSignature,
    Alteration,
    DeadlineManipulation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeryIndicator {
    pub forgery_type: ForgeryType,
    pub description: String,
    pub risk_level: RiskLevel,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandwritingAnalysisResult {
    pub signatures: Vec<SignatureProfile>,
    pub handwritten_elements: Vec<HandwrittenElement>,
    pub forgery_indicators: Vec<ForgeryIndicator>,
    /// 0–100.
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub requires_expert_review: bool,
}

impl HandwritingAnalysisResult {
    pub fn empty() -> Self {
        Self {
            signatures: Vec::new(),
            handwritten_elements: Vec::new(),
            forgery_indicators: Vec::new(),
            risk_score: 0.0,
            risk_level: RiskLevel::Low,
            requires_expert_review: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_levels_compare_by_escalation() {
        assert!(RiskLevel::Medium >= RiskLevel::Medium);
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Low < RiskLevel::Critical);
    }

    #[test]
    fn score_buckets_are_contiguous() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::Critical);
    }
}
