//! Final multi-factor confidence scoring.
//!
//! Re-derives its dimensions over the complete analysis rather than
//! trusting the reasoner's interim calibration, adds consistency
//! cross-checks, and renders a short explanation for display.

use shared_types::{
    ConfidenceLevel, ConfidenceMetrics, DocumentCategory, DocumentContext, DocumentType,
    EntityType, ExtractedEntity, LegalAnalysis, ReasoningChain, RelationshipMap,
    TimelineEntry,
};
use tracing::debug;

const ENTITY_WEIGHT: f64 = 0.20;
const DOC_TYPE_WEIGHT: f64 = 0.15;
const TEXT_QUALITY_WEIGHT: f64 = 0.15;
const STRUCTURAL_WEIGHT: f64 = 0.10;
const RELATIONSHIP_WEIGHT: f64 = 0.15;
const LEGAL_WEIGHT: f64 = 0.10;
const TEMPORAL_WEIGHT: f64 = 0.05;
const AGREEMENT_WEIGHT: f64 = 0.10;

const MAX_LISTED: usize = 5;

pub struct ScoringInput<'a> {
    pub context: &'a DocumentContext,
    pub document_type: DocumentType,
    /// Normalized signature score of the winning type, 0–1.
    pub type_score: f64,
    pub entities: &'a [ExtractedEntity],
    pub relationships: &'a RelationshipMap,
    pub legal: &'a LegalAnalysis,
    pub timeline: &'a [TimelineEntry],
    pub chains: &'a [ReasoningChain],
}

pub fn score(input: &ScoringInput<'_>) -> ConfidenceMetrics {
    let text_quality = input.context.ocr_quality;
    let structural_clarity = input.context.structural_clarity;
    let entity_extraction = entity_dimension(input.entities);
    let (document_type, mut ambiguous) = doc_type_dimension(input);
    let relationship = relationship_dimension(input.entities, input.relationships);
    let legal_analysis = legal_dimension(input.legal);
    let temporal = temporal_dimension(input.timeline);
    let reasoning_agreement = agreement_dimension(input.chains);

    let overall_score = text_quality * TEXT_QUALITY_WEIGHT
        + structural_clarity * STRUCTURAL_WEIGHT
        + entity_extraction * ENTITY_WEIGHT
        + document_type * DOC_TYPE_WEIGHT
        + relationship * RELATIONSHIP_WEIGHT
        + legal_analysis * LEGAL_WEIGHT
        + temporal * TEMPORAL_WEIGHT
        + reasoning_agreement * AGREEMENT_WEIGHT;
    let overall_score = overall_score.clamp(0.0, 100.0);
    let level = ConfidenceLevel::from_score(overall_score);

    for entity in input.entities {
        if ambiguous.len() >= MAX_LISTED {
            break;
        }
        if entity.confidence < 0.6 || !entity.valid {
            ambiguous.push(format!(
                "{} \"{}\" ({})",
                entity.entity_type.label(),
                entity.value,
                if entity.valid { "low confidence" } else { "unparsed" }
            ));
        }
    }

    let missing_information = missing_items(input);
    let explanation = render_explanation(overall_score, level, &ambiguous, &missing_information);

    debug!(overall_score, ?level, "confidence scoring complete");

    ConfidenceMetrics {
        text_quality,
        structural_clarity,
        entity_extraction,
        document_type,
        relationship,
        legal_analysis,
        temporal,
        reasoning_agreement,
        overall_score,
        level,
        ambiguous_elements: ambiguous,
        missing_information,
        explanation,
    }
}

/// Mean entity confidence scaled by a richness band.
fn entity_dimension(entities: &[ExtractedEntity]) -> f64 {
    if entities.is_empty() {
        return 5.0;
    }
    let mean: f64 =
        entities.iter().map(|e| e.confidence).sum::<f64>() / entities.len() as f64;
    let band = match entities.len() {
        1 => 0.45,
        2..=3 => 0.65,
        4..=7 => 0.85,
        _ => 1.0,
    };
    (mean * band * 100.0).clamp(0.0, 100.0)
}

/// Document-type score with context consistency cross-checks.
fn doc_type_dimension(input: &ScoringInput<'_>) -> (f64, Vec<String>) {
    let mut ambiguous = Vec::new();
    if input.document_type == DocumentType::Unknown {
        ambiguous.push("document type could not be determined".to_string());
        return (15.0, ambiguous);
    }
    let mut score = 50.0 + input.type_score * 50.0;

    if input.document_type.category() == DocumentCategory::CourtFiling
        && !input.context.has_case_caption
    {
        score -= 25.0;
        ambiguous.push(
            "classified as a court filing but no case caption was found".to_string(),
        );
    }
    if input.document_type.category() == DocumentCategory::Notice
        && !input.timeline.iter().any(|t| t.is_deadline)
    {
        score -= 10.0;
        ambiguous.push("classified as a notice but no deadline was found".to_string());
    }
    (score.clamp(0.0, 100.0), ambiguous)
}

/// Density of the relationship graph relative to its candidate nodes.
fn relationship_dimension(
    entities: &[ExtractedEntity],
    relationships: &RelationshipMap,
) -> f64 {
    let nodes = entities
        .iter()
        .filter(|e| {
            matches!(
                e.entity_type,
                EntityType::Person
                    | EntityType::Organization
                    | EntityType::Money
                    | EntityType::Address
            )
        })
        .count();
    if nodes == 0 {
        return 20.0;
    }
    let edges = relationships.party_relationships.len()
        + relationships.amount_relationships.len()
        + usize::from(relationships.primary_property.is_some());
    let density = (edges as f64 / nodes as f64).min(1.0);
    20.0 + 80.0 * density
}

fn legal_dimension(legal: &LegalAnalysis) -> f64 {
    if legal.issues.is_empty() && legal.applicable_statutes.is_empty() {
        // Nothing found is not a failure, but it offers no corroboration.
        return 40.0;
    }
    let mean = if legal.issues.is_empty() {
        0.7
    } else {
        legal.issues.iter().map(|i| i.confidence).sum::<f64>() / legal.issues.len() as f64
    };
    (50.0 + mean * 50.0).clamp(0.0, 100.0)
}

fn temporal_dimension(timeline: &[TimelineEntry]) -> f64 {
    if timeline.is_empty() {
        return 25.0;
    }
    let dated = timeline.iter().filter(|t| t.event_date.is_some()).count();
    25.0 + 75.0 * dated as f64 / timeline.len() as f64
}

/// Share of reasoning steps that confirmed rather than revised findings.
/// Only meaningful once at least two passes have run.
fn agreement_dimension(chains: &[ReasoningChain]) -> f64 {
    if chains.len() < 2 {
        return 50.0;
    }
    let steps: Vec<f64> = chains
        .iter()
        .flat_map(|c| c.steps.iter().map(|s| s.confidence_impact))
        .collect();
    if steps.is_empty() {
        return 50.0;
    }
    let confirming = steps.iter().filter(|i| **i >= 0.0).count();
    100.0 * confirming as f64 / steps.len() as f64
}

fn missing_items(input: &ScoringInput<'_>) -> Vec<String> {
    let has = |t: EntityType| input.entities.iter().any(|e| e.entity_type == t);
    let mut missing = Vec::new();
    if !has(EntityType::Person) && !has(EntityType::Organization) {
        missing.push("no parties identified".to_string());
    }
    if !has(EntityType::Date) {
        missing.push("no dates found".to_string());
    }
    if !has(EntityType::Money) {
        missing.push("no monetary amounts found".to_string());
    }
    if !has(EntityType::Address) {
        missing.push("no property address found".to_string());
    }
    if input.document_type.category() == DocumentCategory::CourtFiling
        && !has(EntityType::CourtCase)
    {
        missing.push("court filing without a case number".to_string());
    }
    if input.relationships.primary_property.is_none() && has(EntityType::Address) {
        missing.push("could not settle on a primary property".to_string());
    }
    missing.truncate(MAX_LISTED);
    missing
}

fn render_explanation(
    overall: f64,
    level: ConfidenceLevel,
    ambiguous: &[String],
    missing: &[String],
) -> String {
    let mut out = format!("Overall confidence {:.0}/100 ({:?}).", overall, level);
    if !ambiguous.is_empty() {
        out.push_str(" Uncertain: ");
        out.push_str(&ambiguous.join("; "));
        out.push('.');
    }
    if !missing.is_empty() {
        out.push_str(" Missing: ");
        out.push_str(&missing.join("; "));
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shared_types::TextSpan;

    use super::*;

    fn entity(id: &str, entity_type: EntityType, confidence: f64) -> ExtractedEntity {
        ExtractedEntity::new(id, entity_type, "x", confidence, "test", TextSpan::new(0, 1))
    }

    fn base_input<'a>(
        context: &'a DocumentContext,
        entities: &'a [ExtractedEntity],
        relationships: &'a RelationshipMap,
        legal: &'a LegalAnalysis,
    ) -> ScoringInput<'a> {
        ScoringInput {
            context,
            document_type: DocumentType::Unknown,
            type_score: 0.0,
            entities,
            relationships,
            legal,
            timeline: &[],
            chains: &[],
        }
    }

    #[test]
    fn overall_is_a_convex_combination() {
        let context = DocumentContext::empty();
        let entities = vec![
            entity("ent-1", EntityType::Person, 0.9),
            entity("ent-2", EntityType::Money, 0.8),
        ];
        let relationships = RelationshipMap::empty();
        let legal = LegalAnalysis::empty();
        let metrics = score(&base_input(&context, &entities, &relationships, &legal));
        let max = metrics
            .dimensions()
            .into_iter()
            .fold(0.0f64, f64::max);
        assert!(metrics.overall_score <= max + 1e-9);
    }

    #[test]
    fn bare_text_reports_missing_information() {
        let context = DocumentContext::empty();
        let relationships = RelationshipMap::empty();
        let legal = LegalAnalysis::empty();
        let metrics = score(&base_input(&context, &[], &relationships, &legal));
        assert!(!metrics.missing_information.is_empty());
        assert_eq!(metrics.level, ConfidenceLevel::Uncertain);
    }

    #[test]
    fn court_filing_without_caption_is_penalized() {
        let context = DocumentContext::empty();
        let entities = vec![entity("ent-1", EntityType::Person, 0.9)];
        let relationships = RelationshipMap::empty();
        let legal = LegalAnalysis::empty();
        let mut input = base_input(&context, &entities, &relationships, &legal);
        input.document_type = DocumentType::CourtSummons;
        input.type_score = 0.8;
        let penalized = score(&input);

        let mut with_caption = context.clone();
        with_caption.has_case_caption = true;
        input.context = &with_caption;
        let clean = score(&input);
        assert!(penalized.document_type < clean.document_type);
        assert!(penalized
            .ambiguous_elements
            .iter()
            .any(|a| a.contains("case caption")));
    }

    #[test]
    fn unparsed_entities_are_listed_as_ambiguous() {
        let context = DocumentContext::empty();
        let mut bad_date = entity("ent-1", EntityType::Date, 0.9);
        bad_date.valid = false;
        bad_date.value = "February 30, 2024".into();
        let entities = vec![bad_date];
        let relationships = RelationshipMap::empty();
        let legal = LegalAnalysis::empty();
        let metrics = score(&base_input(&context, &entities, &relationships, &legal));
        assert!(metrics
            .ambiguous_elements
            .iter()
            .any(|a| a.contains("unparsed")));
        assert!(metrics.explanation.contains("Missing:"));
    }
}
