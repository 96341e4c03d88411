use serde::{Deserialize, Serialize};

/// Closed taxonomy of recognized document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    FourteenDayNotice,
    EvictionNotice,
    NoticeToVacate,
    LeaseViolationNotice,
    LateRentNotice,
    LeaseAgreement,
    CourtSummons,
    CourtComplaint,
    HearingNotice,
    Judgment,
    WritOfRecovery,
    DemandLetter,
    Correspondence,
    Unknown,
}

impl DocumentType {
    /// Coarse grouping used by the result contract and the confidence
    /// scorer's consistency cross-checks.
    pub fn category(&self) -> DocumentCategory {
        match self {
            DocumentType::FourteenDayNotice
            | DocumentType::EvictionNotice
            | DocumentType::NoticeToVacate
            | DocumentType::LeaseViolationNotice
            | DocumentType::LateRentNotice => DocumentCategory::Notice,
            DocumentType::CourtSummons
            | DocumentType::CourtComplaint
            | DocumentType::HearingNotice
            | DocumentType::Judgment
            | DocumentType::WritOfRecovery => DocumentCategory::CourtFiling,
            DocumentType::LeaseAgreement => DocumentCategory::Contract,
            DocumentType::DemandLetter | DocumentType::Correspondence => {
                DocumentCategory::Correspondence
            }
            DocumentType::Unknown => DocumentCategory::Unknown,
        }
    }

    pub fn is_court_filing(&self) -> bool {
        self.category() == DocumentCategory::CourtFiling
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Notice,
    CourtFiling,
    Contract,
    Correspondence,
    Unknown,
}

/// How the document reads structurally, independent of its legal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFlowType {
    LegalFiling,
    Letter,
    Form,
    Notice,
    Contract,
    Evidence,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    NumberedClause,
    CapitalizedHeader,
    KeywordAnchored,
    Preamble,
}

/// One structural segment of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub title: String,
    pub kind: SectionKind,
    /// Byte offset of the section heading in the normalized text.
    pub start: usize,
    /// Byte offset one past the section's last byte.
    pub end: usize,
}

/// Structural read of the document, built once by the context analyzer
/// and read-only afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentContext {
    pub has_letterhead: bool,
    pub has_date_line: bool,
    pub has_address_block: bool,
    pub has_salutation: bool,
    pub has_signature_block: bool,
    pub has_notary_block: bool,
    pub has_case_caption: bool,
    pub flow_type: DocumentFlowType,
    pub word_count: usize,
    pub char_count: usize,
    pub sentence_count: usize,
    pub avg_word_length: f64,
    /// 0–100; from the preprocessor's quality assessment.
    pub ocr_quality: f64,
    /// 0–100; how many structural markers were found.
    pub structural_clarity: f64,
    pub sections: Vec<DocumentSection>,
}

impl DocumentContext {
    /// Context for empty or unusable input: no structure, zero scores.
    pub fn empty() -> Self {
        Self {
            has_letterhead: false,
            has_date_line: false,
            has_address_block: false,
            has_salutation: false,
            has_signature_block: false,
            has_notary_block: false,
            has_case_caption: false,
            flow_type: DocumentFlowType::Unknown,
            word_count: 0,
            char_count: 0,
            sentence_count: 0,
            avg_word_length: 0.0,
            ocr_quality: 0.0,
            structural_clarity: 0.0,
            sections: Vec::new(),
        }
    }

    pub fn structural_marker_count(&self) -> usize {
        [
            self.has_letterhead,
            self.has_date_line,
            self.has_address_block,
            self.has_salutation,
            self.has_signature_block,
            self.has_notary_block,
            self.has_case_caption,
        ]
        .iter()
        .filter(|b| **b)
        .count()
    }
}
