use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Byte offsets into the normalized document text.
///
/// Invariant: `0 <= start < end <= text.len()`, and both offsets fall on
/// UTF-8 character boundaries (they come from regex match positions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Closed taxonomy of extractable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Person,
    Organization,
    Address,
    Date,
    Money,
    Statute,
    CourtCase,
    Deadline,
    Phone,
    Email,
    UnitNumber,
}

impl EntityType {
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Person => "PERSON",
            EntityType::Organization => "ORGANIZATION",
            EntityType::Address => "ADDRESS",
            EntityType::Date => "DATE",
            EntityType::Money => "MONEY",
            EntityType::Statute => "STATUTE",
            EntityType::CourtCase => "COURT_CASE",
            EntityType::Deadline => "DEADLINE",
            EntityType::Phone => "PHONE",
            EntityType::Email => "EMAIL",
            EntityType::UnitNumber => "UNIT_NUMBER",
        }
    }
}

/// A typed span of text promoted out of the multi-pass reasoner.
///
/// `attributes` carries per-type annotations (role, amount_type, parsed
/// values); `related_entities` holds undirected proximity links to other
/// entity ids from the same analysis run. Both use ordered containers so
/// serialization is stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub id: String,
    pub entity_type: EntityType,
    pub value: String,
    /// Calibrated confidence in [0, 1].
    pub confidence: f64,
    /// Name of the pattern or rule that produced this entity.
    pub extraction_method: String,
    pub span: TextSpan,
    /// False when the value matched a pattern but failed to parse
    /// (e.g. an impossible date); such entities are kept, not dropped.
    pub valid: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub related_entities: BTreeSet<String>,
}

impl ExtractedEntity {
    pub fn new(
        id: impl Into<String>,
        entity_type: EntityType,
        value: impl Into<String>,
        confidence: f64,
        extraction_method: impl Into<String>,
        span: TextSpan,
    ) -> Self {
        Self {
            id: id.into(),
            entity_type,
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            extraction_method: extraction_method.into(),
            span,
            valid: true,
            attributes: BTreeMap::new(),
            related_entities: BTreeSet::new(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped_to_unit_interval() {
        let e = ExtractedEntity::new(
            "ent-1",
            EntityType::Money,
            "$1,200.00",
            1.7,
            "money_pattern",
            TextSpan::new(0, 9),
        );
        assert_eq!(e.confidence, 1.0);
    }

    #[test]
    fn span_length_never_underflows() {
        let s = TextSpan::new(5, 3);
        assert_eq!(s.len(), 0);
        assert!(s.is_empty());
    }
}
