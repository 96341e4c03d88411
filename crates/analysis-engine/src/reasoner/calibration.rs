//! Pass 4: cross-pass confidence calibration.
//!
//! Produces an interim quality picture from what the first three passes
//! saw. The final scorer re-derives its own dimensions over the complete
//! analysis; this pass exists so the reasoner can flag weak areas early
//! and log them into its chain.

use shared_types::{
    DocumentContext, DocumentType, ExtractedEntity, ReasoningChain, TimelineEntry,
};

const ENTITY_WEIGHT: f64 = 0.25;
const DOC_TYPE_WEIGHT: f64 = 0.20;
const TEXT_QUALITY_WEIGHT: f64 = 0.20;
const RELATIONSHIP_WEIGHT: f64 = 0.15;
const TEMPORAL_WEIGHT: f64 = 0.10;
const STRUCTURAL_WEIGHT: f64 = 0.10;

/// A dimension below this is worth a note in the reasoning chain.
const WEAK_DIMENSION: f64 = 40.0;

/// Interim per-dimension quality scores, each 0–100.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSummary {
    pub entity_score: f64,
    pub doc_type_score: f64,
    pub text_quality_score: f64,
    pub relationship_score: f64,
    pub temporal_score: f64,
    pub structural_score: f64,
    pub overall: f64,
    pub weak_dimensions: Vec<String>,
}

pub fn calibrate(
    entities: &[ExtractedEntity],
    document_type: DocumentType,
    type_score: f64,
    timeline: &[TimelineEntry],
    context: &DocumentContext,
    chain: &mut ReasoningChain,
) -> CalibrationSummary {
    let entity_score = entity_dimension(entities);
    let doc_type_score = if document_type == DocumentType::Unknown {
        15.0
    } else {
        (40.0 + type_score * 60.0).min(100.0)
    };
    let text_quality_score = context.ocr_quality;
    let relationship_score = relationship_dimension(entities);
    let temporal_score = temporal_dimension(timeline);
    let structural_score = context.structural_clarity;

    let overall = entity_score * ENTITY_WEIGHT
        + doc_type_score * DOC_TYPE_WEIGHT
        + text_quality_score * TEXT_QUALITY_WEIGHT
        + relationship_score * RELATIONSHIP_WEIGHT
        + temporal_score * TEMPORAL_WEIGHT
        + structural_score * STRUCTURAL_WEIGHT;

    let mut weak_dimensions = Vec::new();
    for (name, score) in [
        ("entity", entity_score),
        ("document_type", doc_type_score),
        ("text_quality", text_quality_score),
        ("relationship", relationship_score),
        ("temporal", temporal_score),
        ("structural", structural_score),
    ] {
        if score < WEAK_DIMENSION {
            weak_dimensions.push(format!("{} dimension is weak ({:.0})", name, score));
        }
    }

    chain.record(
        "calibration",
        format!("interim confidence {:.1}", overall),
        vec![
            format!("entity={:.0}", entity_score),
            format!("doc_type={:.0}", doc_type_score),
            format!("text_quality={:.0}", text_quality_score),
            format!("relationship={:.0}", relationship_score),
            format!("temporal={:.0}", temporal_score),
            format!("structural={:.0}", structural_score),
        ],
        weak_dimensions.clone(),
        overall / 100.0,
    );

    CalibrationSummary {
        entity_score,
        doc_type_score,
        text_quality_score,
        relationship_score,
        temporal_score,
        structural_score,
        overall: overall.clamp(0.0, 100.0),
        weak_dimensions,
    }
}

/// Mean entity confidence scaled by richness: a handful of high-confidence
/// entities beats a pile of weak ones, but an empty set scores zero.
fn entity_dimension(entities: &[ExtractedEntity]) -> f64 {
    if entities.is_empty() {
        return 0.0;
    }
    let mean: f64 =
        entities.iter().map(|e| e.confidence).sum::<f64>() / entities.len() as f64;
    let richness = match entities.len() {
        0 => 0.0,
        1..=2 => 0.6,
        3..=5 => 0.8,
        _ => 1.0,
    };
    mean * richness * 100.0
}

/// Relationship mapping runs after the reasoner, so this pass estimates
/// the dimension from the share of parties that already carry a role.
fn relationship_dimension(entities: &[ExtractedEntity]) -> f64 {
    let parties: Vec<_> = entities
        .iter()
        .filter(|e| {
            matches!(
                e.entity_type,
                shared_types::EntityType::Person | shared_types::EntityType::Organization
            )
        })
        .collect();
    if parties.is_empty() {
        return 30.0;
    }
    let with_role = parties
        .iter()
        .filter(|e| e.attribute("role").is_some_and(|r| r != "unknown"))
        .count();
    30.0 + 70.0 * with_role as f64 / parties.len() as f64
}

fn temporal_dimension(timeline: &[TimelineEntry]) -> f64 {
    if timeline.is_empty() {
        return 25.0;
    }
    let dated = timeline.iter().filter(|t| t.event_date.is_some()).count();
    let coverage = dated as f64 / timeline.len() as f64;
    25.0 + 75.0 * coverage
}
