//! Pass 2: evidence scoring and promotion. Weak pattern matches need
//! corroborating evidence; strong matches (base >= 0.85) pass on their
//! own. Promoted parties get roles, promoted amounts get a type.

use chrono::NaiveDate;
use shared_types::{EntityType, ExtractedEntity, PartyRole, ReasoningChain, TextSpan};

use crate::parse::{parse_amount, parse_date};
use crate::patterns::{contains_any, context_window, preceding_window, MONEY_CONTEXT_KEYWORDS};
use crate::relationships::{infer_party_role, role_attribute, CaptionSide};

use super::extraction::Candidate;

/// Default scale factor in the promotion inequality:
/// `evidence >= threshold * (1 - base_confidence)`.
pub const DEFAULT_EVIDENCE_THRESHOLD: f64 = 0.5;
/// Matches at or above this base confidence bypass evidence entirely.
const BYPASS_CONFIDENCE: f64 = 0.85;

/// How far a parsed date may sit from "today" and still count as
/// corroborating evidence.
const DATE_RECENCY_DAYS: i64 = 730;

pub fn validate_candidates(
    text: &str,
    header_len: usize,
    candidates: Vec<Candidate>,
    today: NaiveDate,
    threshold: f64,
    chain: &mut ReasoningChain,
) -> Vec<ExtractedEntity> {
    let mut entities = Vec::new();
    let mut rejected = 0usize;

    for candidate in candidates {
        let evidence = evidence_score(text, header_len, &candidate, today);
        let promoted = candidate.confidence >= BYPASS_CONFIDENCE
            || evidence >= threshold * (1.0 - candidate.confidence);
        if !promoted {
            rejected += 1;
            continue;
        }

        let id = format!("ent-{:03}", entities.len() + 1);
        let confidence = (candidate.confidence + evidence * 0.25).min(0.99);
        let mut entity = ExtractedEntity::new(
            id,
            candidate.entity_type,
            candidate.value.clone(),
            confidence,
            candidate.extraction_method,
            candidate.span,
        );
        annotate(&mut entity, text, &candidate, today);
        entities.push(entity);
    }

    chain.record(
        "evidence_validation",
        format!("promoted {} entities, rejected {}", entities.len(), rejected),
        vec![format!("threshold {}", threshold)],
        entities.iter().map(|e| e.id.clone()).collect(),
        if rejected > 0 { -0.05 } else { 0.05 },
    );

    entities
}

/// Additive evidence from independent signals. Each signal is bounded,
/// so the total stays comparable across entity types.
fn evidence_score(text: &str, header_len: usize, candidate: &Candidate, today: NaiveDate) -> f64 {
    let mut evidence = 0.0;

    if candidate.span.start < header_len {
        evidence += 0.3;
    }
    evidence += match candidate.occurrences {
        0 | 1 => 0.0,
        2 => 0.2,
        _ => 0.3,
    };

    match candidate.entity_type {
        EntityType::Money => {
            let before = preceding_window(text, candidate.span, 50).to_lowercase();
            if contains_any(&before, MONEY_CONTEXT_KEYWORDS) {
                evidence += 0.4;
            }
        }
        EntityType::Date => {
            if let Ok(date) = parse_date(&candidate.value) {
                let distance = (date - today).num_days().abs();
                if distance <= DATE_RECENCY_DAYS {
                    evidence += 0.3;
                }
            }
        }
        EntityType::Person | EntityType::Organization => {
            let (role, _) = infer_party_role(text, candidate.span, candidate.caption_side);
            if role != PartyRole::Unknown {
                evidence += 0.4;
            }
        }
        EntityType::Statute => {
            if candidate.value.contains("504B.") {
                evidence += 0.3;
            }
        }
        EntityType::Deadline => {
            if extract_days(&candidate.value)
                .map(|d| (1..=365).contains(&d))
                .unwrap_or(false)
            {
                evidence += 0.3;
            }
        }
        EntityType::Address => {
            let window = context_window(text, candidate.span, 100).to_lowercase();
            if window.contains("premises") || window.contains("property") {
                evidence += 0.3;
            }
        }
        EntityType::CourtCase => {
            if candidate
                .value
                .split('-')
                .next()
                .and_then(|c| c.parse::<u32>().ok())
                .map(|c| (1..=87).contains(&c))
                .unwrap_or(false)
            {
                evidence += 0.3;
            }
        }
        EntityType::Phone | EntityType::Email | EntityType::UnitNumber => {}
    }

    evidence
}

fn annotate(entity: &mut ExtractedEntity, text: &str, candidate: &Candidate, _today: NaiveDate) {
    match entity.entity_type {
        EntityType::Person | EntityType::Organization => {
            let (role, role_confidence) =
                infer_party_role(text, candidate.span, candidate.caption_side);
            entity.set_attribute("role", role_attribute(role));
            entity.set_attribute("role_confidence", format!("{:.2}", role_confidence));
            if let Some(side) = candidate.caption_side {
                entity.set_attribute(
                    "caption_side",
                    match side {
                        CaptionSide::Left => "left",
                        CaptionSide::Right => "right",
                    },
                );
            }
        }
        EntityType::Money => match parse_amount(&entity.value) {
            Ok(amount) => {
                entity.set_attribute("amount", format!("{:.2}", amount));
                // Deduped value; downstream sum checks need to know how
                // many times it appeared.
                entity.set_attribute("occurrences", candidate.occurrences.to_string());
                let window =
                    context_window(text, candidate.span, 30).to_lowercase();
                let amount_type = crate::relationships::classify_amount_context(&window);
                entity.set_attribute(
                    "amount_type",
                    serde_variant_name(&amount_type),
                );
            }
            Err(_) => entity.valid = false,
        },
        EntityType::Date => match parse_date(&entity.value) {
            Ok(date) => entity.set_attribute("parsed_date", date.to_string()),
            Err(_) => entity.valid = false,
        },
        EntityType::Deadline => match extract_days(&entity.value) {
            Some(days) => entity.set_attribute("days", days.to_string()),
            None => {
                // "on or before <date>" deadlines carry a date, not a count.
                if let Some(date) = embedded_date(&entity.value) {
                    entity.set_attribute("parsed_date", date.to_string());
                } else {
                    entity.valid = false;
                }
            }
        },
        _ => {}
    }
}

fn serde_variant_name(amount_type: &shared_types::AmountType) -> String {
    serde_json::to_string(amount_type)
        .unwrap_or_default()
        .trim_matches('"')
        .to_string()
}

pub(super) fn extract_days(value: &str) -> Option<u32> {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

pub(super) fn embedded_date(value: &str) -> Option<NaiveDate> {
    // Strip a "no later than" / "on or before" prefix and try the rest.
    let lower = value.to_lowercase();
    for prefix in ["no later than", "on or before"] {
        if let Some(rest) = lower.strip_prefix(prefix) {
            let offset = value.len() - rest.len();
            return parse_date(value[offset..].trim()).ok();
        }
    }
    parse_date(value).ok()
}
