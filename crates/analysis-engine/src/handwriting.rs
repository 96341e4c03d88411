//! Signature, handwritten-element, and forgery-indicator analysis.
//!
//! Everything here works from text cues; there is no image analysis.
//! Signature hashes are for exact-duplicate detection only.

use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use shared_types::{
    EntityType, ExtractedEntity, ForgeryIndicator, ForgeryType, HandwrittenElement,
    HandwrittenKind, HandwritingAnalysisResult, RiskLevel, SignatureKind, SignatureProfile,
    TextSpan,
};
use tracing::debug;

/// Line-item totals may be off by rounding; beyond this it is a finding.
const AMOUNT_TOLERANCE: f64 = 1.0;
/// Dates inside one document further apart than this look inconsistent.
const DATE_SPREAD_DAYS: i64 = 30;

lazy_static! {
    static ref ELECTRONIC_SIG: Regex =
        Regex::new(r"/s/\s*([A-Za-z][A-Za-z .'-]{1,50})").unwrap();
    static ref SIGNED_LINE: Regex =
        Regex::new(r"(?im)^\s*(?:signed|signature)\s*:\s*(\S[^\n]{0,60})").unwrap();
    static ref UNDERSCORE_SIG: Regex =
        Regex::new(r"(?m)_{3,}\s*\n\s*([A-Z][A-Za-z .,'-]{2,60})").unwrap();
    static ref WITNESS_SIG: Regex =
        Regex::new(r"(?im)^\s*witness(?:ed\s+by)?\s*:\s*(\S[^\n]{0,60})").unwrap();
    static ref NOTARY_SIG: Regex = Regex::new(
        r"(?i)(?:notary\s+public|subscribed\s+and\s+sworn)[^\n]{0,40}?[:\s]([A-Z][A-Za-z .'-]{2,50})?"
    )
    .unwrap();
    static ref INITIALS_LINE: Regex =
        Regex::new(r"(?im)^\s*initial(?:s|ed)?\s*:\s*([A-Z][.A-Z ]{1,8})").unwrap();
    static ref DATE_FILL: Regex =
        Regex::new(r"(?im)^\s*dated?\s*:\s*_*\s*(\d{1,2}/\d{1,2}/\d{2,4})").unwrap();
    static ref AMOUNT_FILL: Regex =
        Regex::new(r"(?im)^\s*amount\s*:\s*_*\s*(\$[\d,]+(?:\.\d{2})?)").unwrap();
    static ref MARGIN_INITIALS: Regex = Regex::new(r"\b([A-Z]\.\s?[A-Z]\.)").unwrap();
    static ref ANNOTATION: Regex =
        Regex::new(r"(?i)\[(?:handwritten|illegible|margin note)[^\]]*\]").unwrap();
    static ref ALTERATION: Regex = Regex::new(
        r"(?i)(white[- ]?out|correction\s+fluid|strike[- ]?through|crossed\s+out|written\s+over|scribbled\s+out|altered)"
    )
    .unwrap();
}

fn content_hash(value: &str) -> String {
    let normalized = value.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn extract_signatures(text: &str) -> Vec<SignatureProfile> {
    let mut signatures = Vec::new();
    let mut push = |kind: SignatureKind, value: &str, start: usize, end: usize, conf: f64| {
        let value = value.trim().trim_end_matches(['_', ',']).trim();
        if value.is_empty() {
            return;
        }
        signatures.push(SignatureProfile {
            kind,
            value: value.to_string(),
            span: TextSpan::new(start, end),
            content_hash: content_hash(value),
            confidence: conf,
        });
    };

    for c in ELECTRONIC_SIG.captures_iter(text) {
        let m = c.get(1).unwrap();
        push(SignatureKind::Electronic, m.as_str(), m.start(), m.end(), 0.9);
    }
    for c in SIGNED_LINE.captures_iter(text) {
        let m = c.get(1).unwrap();
        push(SignatureKind::SignatureLine, m.as_str(), m.start(), m.end(), 0.85);
    }
    for c in UNDERSCORE_SIG.captures_iter(text) {
        let m = c.get(1).unwrap();
        push(SignatureKind::SignatureLine, m.as_str(), m.start(), m.end(), 0.7);
    }
    for c in WITNESS_SIG.captures_iter(text) {
        let m = c.get(1).unwrap();
        push(SignatureKind::Witness, m.as_str(), m.start(), m.end(), 0.8);
    }
    for c in NOTARY_SIG.captures_iter(text) {
        if let Some(m) = c.get(1) {
            push(SignatureKind::Notary, m.as_str(), m.start(), m.end(), 0.75);
        }
    }
    for c in INITIALS_LINE.captures_iter(text) {
        let m = c.get(1).unwrap();
        push(SignatureKind::Initials, m.as_str(), m.start(), m.end(), 0.6);
    }
    signatures
}

fn extract_handwritten(text: &str) -> Vec<HandwrittenElement> {
    let mut elements = Vec::new();
    for c in DATE_FILL.captures_iter(text) {
        let m = c.get(1).unwrap();
        elements.push(HandwrittenElement {
            kind: HandwrittenKind::Date,
            value: m.as_str().to_string(),
            span: TextSpan::new(m.start(), m.end()),
        });
    }
    for c in AMOUNT_FILL.captures_iter(text) {
        let m = c.get(1).unwrap();
        elements.push(HandwrittenElement {
            kind: HandwrittenKind::Amount,
            value: m.as_str().to_string(),
            span: TextSpan::new(m.start(), m.end()),
        });
    }
    for c in MARGIN_INITIALS.captures_iter(text) {
        let m = c.get(1).unwrap();
        elements.push(HandwrittenElement {
            kind: HandwrittenKind::Initials,
            value: m.as_str().to_string(),
            span: TextSpan::new(m.start(), m.end()),
        });
    }
    for m in ANNOTATION.find_iter(text) {
        elements.push(HandwrittenElement {
            kind: HandwrittenKind::Annotation,
            value: m.as_str().to_string(),
            span: TextSpan::new(m.start(), m.end()),
        });
    }
    elements
}

fn parsed_dates(entities: &[ExtractedEntity]) -> Vec<(NaiveDate, &ExtractedEntity)> {
    entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Date)
        .filter_map(|e| {
            e.attribute("parsed_date")
                .and_then(|d| d.parse().ok())
                .map(|d| (d, e))
        })
        .collect()
}

fn check_dates(
    entities: &[ExtractedEntity],
    today: NaiveDate,
    indicators: &mut Vec<ForgeryIndicator>,
) {
    let dates = parsed_dates(entities);

    let future: Vec<&str> = dates
        .iter()
        .filter(|(d, _)| *d > today)
        .map(|(_, e)| e.value.as_str())
        .collect();
    if !future.is_empty() {
        indicators.push(ForgeryIndicator {
            forgery_type: ForgeryType::FutureDated,
            description: "The document carries a date after the analysis date.".into(),
            risk_level: RiskLevel::High,
            confidence: 0.8,
            evidence: future.iter().map(|s| s.to_string()).collect(),
        });
    }

    if let (Some(min), Some(max)) = (
        dates.iter().map(|(d, _)| *d).min(),
        dates.iter().map(|(d, _)| *d).max(),
    ) {
        let spread = (max - min).num_days();
        if spread > DATE_SPREAD_DAYS {
            indicators.push(ForgeryIndicator {
                forgery_type: ForgeryType::InconsistentDates,
                description: format!(
                    "Dates in the document span {} days, which may indicate \
                     mixed or re-used pages.",
                    spread
                ),
                risk_level: RiskLevel::Medium,
                confidence: 0.4,
                evidence: vec![min.to_string(), max.to_string()],
            });
        }
    }
}

fn check_amounts(entities: &[ExtractedEntity], indicators: &mut Vec<ForgeryIndicator>) {
    let mut total: Option<f64> = None;
    let mut items: Vec<f64> = Vec::new();
    for entity in entities {
        if entity.entity_type != EntityType::Money {
            continue;
        }
        let Some(amount) = entity.attribute("amount").and_then(|a| a.parse::<f64>().ok())
        else {
            continue;
        };
        if entity.attribute("amount_type") == Some("total_owed") {
            total = Some(amount);
        } else {
            // A rent listed twice counts twice toward the sum; money
            // entities are deduped by value and carry their count.
            let count = entity
                .attribute("occurrences")
                .and_then(|o| o.parse::<f64>().ok())
                .unwrap_or(1.0);
            items.push(amount * count);
        }
    }
    let Some(total) = total else { return };
    if items.is_empty() {
        return;
    }
    let sum: f64 = items.iter().sum();
    if (sum - total).abs() > AMOUNT_TOLERANCE {
        indicators.push(ForgeryIndicator {
            forgery_type: ForgeryType::AmountMismatch,
            description: format!(
                "Listed amounts sum to ${:.2} but the stated total is ${:.2}.",
                sum, total
            ),
            risk_level: RiskLevel::High,
            confidence: 0.7,
            evidence: vec![format!("sum ${:.2}", sum), format!("total ${:.2}", total)],
        });
    }
}

fn check_duplicate_signatures(
    signatures: &[SignatureProfile],
    indicators: &mut Vec<ForgeryIndicator>,
) {
    let mut seen: Vec<(&str, usize)> = Vec::new();
    for sig in signatures {
        match seen.iter_mut().find(|(h, _)| *h == sig.content_hash) {
            Some((_, count)) => *count += 1,
            None => seen.push((&sig.content_hash, 1)),
        }
    }
    for (hash, count) in seen {
        if count < 2 {
            continue;
        }
        let spans: Vec<TextSpan> = signatures
            .iter()
            .filter(|s| s.content_hash == hash)
            .map(|s| s.span)
            .collect();
        // Same hash at one location (re-matched by two patterns) is noise;
        // distinct positions are the signal.
        if spans.windows(2).all(|w| w[0] == w[1]) {
            continue;
        }
        let value = signatures
            .iter()
            .find(|s| s.content_hash == hash)
            .map(|s| s.value.clone())
            .unwrap_or_default();
        indicators.push(ForgeryIndicator {
            forgery_type: ForgeryType::DuplicateSignature,
            description: format!(
                "The signature \"{}\" appears {} times with byte-identical \
                 content, which can indicate a copied signature block.",
                value, count
            ),
            risk_level: RiskLevel::Medium,
            confidence: 0.75,
            evidence: spans
                .iter()
                .map(|s| format!("offset {}..{}", s.start, s.end))
                .collect(),
        });
    }
}

fn check_alterations(text: &str, indicators: &mut Vec<ForgeryIndicator>) {
    let hits: Vec<String> = ALTERATION
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    if !hits.is_empty() {
        indicators.push(ForgeryIndicator {
            forgery_type: ForgeryType::Alteration,
            description: "The text mentions physical corrections or overwrites.".into(),
            risk_level: RiskLevel::Medium,
            confidence: 0.6,
            evidence: hits,
        });
    }
}

/// A pay-or-quit notice whose own dates allow fewer days than it states
/// suggests the notice date was adjusted after the fact.
fn check_deadline_window(
    text_lower: &str,
    entities: &[ExtractedEntity],
    indicators: &mut Vec<ForgeryIndicator>,
) {
    if !text_lower.contains("pay or quit")
        && !text_lower.contains("pay or vacate")
        && !text_lower.contains("notice to vacate")
    {
        return;
    }
    let stated: Option<i64> = entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Deadline)
        .filter_map(|e| e.attribute("days").and_then(|d| d.parse().ok()))
        .min();
    let Some(stated) = stated else { return };

    let dates = parsed_dates(entities);
    let (Some(min), Some(max)) = (
        dates.iter().map(|(d, _)| *d).min(),
        dates.iter().map(|(d, _)| *d).max(),
    ) else {
        return;
    };
    let actual = max - min;
    if actual < Duration::days(stated) && actual > Duration::zero() {
        indicators.push(ForgeryIndicator {
            forgery_type: ForgeryType::DeadlineManipulation,
            description: format!(
                "The notice states {} days but its own dates allow only {}.",
                stated,
                actual.num_days()
            ),
            risk_level: RiskLevel::Medium,
            confidence: 0.5,
            evidence: vec![
                format!("stated {} days", stated),
                format!("{} to {}", min, max),
            ],
        });
    }
}

pub fn analyze_handwriting(
    text: &str,
    entities: &[ExtractedEntity],
    today: NaiveDate,
) -> HandwritingAnalysisResult {
    let text_lower = text.to_lowercase();
    let signatures = extract_signatures(text);
    let handwritten_elements = extract_handwritten(text);

    let mut forgery_indicators = Vec::new();
    check_dates(entities, today, &mut forgery_indicators);
    check_amounts(entities, &mut forgery_indicators);
    check_duplicate_signatures(&signatures, &mut forgery_indicators);
    check_alterations(text, &mut forgery_indicators);
    check_deadline_window(&text_lower, entities, &mut forgery_indicators);

    let risk_score: f64 = forgery_indicators
        .iter()
        .map(|i| i.risk_level.weight() * i.confidence)
        .sum::<f64>()
        .clamp(0.0, 100.0);
    let risk_level = RiskLevel::from_score(risk_score);
    let suspicious = forgery_indicators.len();
    let requires_expert_review = risk_level >= RiskLevel::High || suspicious > 2;

    debug!(
        signatures = signatures.len(),
        indicators = suspicious,
        risk_score,
        "handwriting analysis complete"
    );

    HandwritingAnalysisResult {
        signatures,
        handwritten_elements,
        forgery_indicators,
        risk_score,
        risk_level,
        requires_expert_review,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date_entity(id: &str, value: &str, parsed: &str) -> ExtractedEntity {
        let mut e = ExtractedEntity::new(
            id,
            EntityType::Date,
            value,
            0.9,
            "month_name_date",
            TextSpan::new(0, value.len()),
        );
        e.set_attribute("parsed_date", parsed);
        e
    }

    fn money_entity(id: &str, amount: f64, amount_type: &str) -> ExtractedEntity {
        let mut e = ExtractedEntity::new(
            id,
            EntityType::Money,
            format!("${:.2}", amount),
            0.9,
            "money_pattern",
            TextSpan::new(0, 7),
        );
        e.set_attribute("amount", format!("{}", amount));
        e.set_attribute("amount_type", amount_type);
        e
    }

    #[test]
    fn electronic_and_line_signatures_are_extracted() {
        let text = "Sincerely,\n\n/s/ Robert Miller\n\nSigned: Jane Doe\n";
        let sigs = extract_signatures(text);
        assert_eq!(sigs.len(), 2);
        assert_eq!(sigs[0].kind, SignatureKind::Electronic);
        assert_eq!(sigs[0].value, "Robert Miller");
        assert_eq!(sigs[1].kind, SignatureKind::SignatureLine);
    }

    #[test]
    fn byte_identical_signatures_at_two_places_are_flagged() {
        let text = "Signed: Robert Miller\n\nterms and conditions follow\n\n\
                    Signed: Robert Miller\n";
        let result = analyze_handwriting(
            text,
            &[],
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        let dup = result
            .forgery_indicators
            .iter()
            .find(|i| i.forgery_type == ForgeryType::DuplicateSignature)
            .unwrap();
        assert!(dup.risk_level >= RiskLevel::Medium);
        assert_eq!(dup.evidence.len(), 2);
    }

    #[test]
    fn future_dated_documents_are_high_risk() {
        let entities = vec![date_entity("ent-1", "June 1, 2025", "2025-06-01")];
        let result = analyze_handwriting(
            "Dated June 1, 2025",
            &entities,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        let future = result
            .forgery_indicators
            .iter()
            .find(|i| i.forgery_type == ForgeryType::FutureDated)
            .unwrap();
        assert_eq!(future.risk_level, RiskLevel::High);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn line_items_that_miss_the_total_are_flagged() {
        let entities = vec![
            money_entity("ent-1", 1200.0, "rent_owed"),
            money_entity("ent-2", 75.0, "late_fee"),
            money_entity("ent-3", 1500.0, "total_owed"),
        ];
        let result = analyze_handwriting(
            "rent $1,200.00 late fee $75.00 total $1,500.00",
            &entities,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        assert!(result
            .forgery_indicators
            .iter()
            .any(|i| i.forgery_type == ForgeryType::AmountMismatch));
    }

    #[test]
    fn matching_totals_stay_quiet() {
        let entities = vec![
            money_entity("ent-1", 1200.0, "rent_owed"),
            money_entity("ent-2", 75.0, "late_fee"),
            money_entity("ent-3", 1275.0, "total_owed"),
        ];
        let result = analyze_handwriting(
            "rent and fee with matching total",
            &entities,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        assert!(result.forgery_indicators.is_empty());
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(!result.requires_expert_review);
    }

    #[test]
    fn a_notice_whose_dates_undercut_its_stated_days_is_flagged() {
        let mut deadline = ExtractedEntity::new(
            "ent-3",
            EntityType::Deadline,
            "within 14 days",
            0.85,
            "within_days",
            TextSpan::new(50, 64),
        );
        deadline.set_attribute("days", "14");
        let entities = vec![
            date_entity("ent-1", "March 1, 2024", "2024-03-01"),
            date_entity("ent-2", "March 8, 2024", "2024-03-08"),
            deadline,
        ];
        let result = analyze_handwriting(
            "pay or quit within 14 days",
            &entities,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        );
        assert!(result
            .forgery_indicators
            .iter()
            .any(|i| i.forgery_type == ForgeryType::DeadlineManipulation));
    }
}
