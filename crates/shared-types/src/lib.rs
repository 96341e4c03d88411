//! Shared domain types for the tenancy document analysis core.
//!
//! Pure data: everything here is serializable, cloneable, and free of
//! analysis logic beyond small constructors and accessors. The engine
//! crate produces these; outer application layers consume them as JSON.

pub mod analysis;
pub mod confidence;
pub mod document;
pub mod entity;
pub mod error;
pub mod handwriting;
pub mod issue;
pub mod reasoning;
pub mod relationships;
pub mod timeline;
pub mod tone;

pub use analysis::{AnalysisInput, DocumentAnalysis};
pub use confidence::{ConfidenceLevel, ConfidenceMetrics};
pub use document::{
    DocumentCategory, DocumentContext, DocumentFlowType, DocumentSection, DocumentType,
    SectionKind,
};
pub use entity::{EntityType, ExtractedEntity, TextSpan};
pub use error::ParseError;
pub use handwriting::{
    ForgeryIndicator, ForgeryType, HandwritingAnalysisResult, HandwrittenElement, HandwrittenKind,
    RiskLevel, SignatureKind, SignatureProfile,
};
pub use issue::{
    DefenseOption, DefenseType, IssueType, LegalAnalysis, LegalIssue, Severity, StatuteReference,
    UrgencyLevel,
};
pub use reasoning::{ReasoningChain, ReasoningStep};
pub use relationships::{
    AmountRelationship, AmountType, PartyRelationship, PartyRelationshipKind, PartyRole,
    RelationshipMap,
};
pub use timeline::{TimelineEntry, TimelineEventKind};
pub use tone::{
    CommunicationFlow, PartyInfo, ProcessDirection, ToneAnalysisResult, ToneCategory,
};
