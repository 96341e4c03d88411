//! Pass 3: document-type vote and timeline construction.

use chrono::{Duration, NaiveDate};
use shared_types::{
    DocumentContext, DocumentFlowType, DocumentType, EntityType, ExtractedEntity,
    ReasoningChain, TimelineEntry, TimelineEventKind,
};

use crate::dictionary::PhraseDictionary;
use crate::parse::parse_date;
use crate::patterns::context_window;

use super::validation::{embedded_date, extract_days};

/// Structural-hint weight added to court-filing types when a case
/// caption is present.
const CAPTION_WEIGHT: f64 = 1.5;
/// Scale applied to the dictionary's normalized signature scores so they
/// dominate the vote unless structure disagrees strongly.
const SIGNATURE_WEIGHT: f64 = 3.0;

/// Weighted vote over document types. Returns the winner and its
/// normalized signature score (0–1) for calibration.
pub fn classify_document(
    text: &str,
    context: &DocumentContext,
    dictionary: &PhraseDictionary,
    chain: &mut ReasoningChain,
) -> (DocumentType, f64) {
    let scores = dictionary.score_all_types(text);

    let mut best: Option<(DocumentType, f64, f64)> = None;
    for s in &scores {
        let mut vote = s.score * SIGNATURE_WEIGHT;
        if context.has_case_caption && s.doc_type.is_court_filing() {
            vote += CAPTION_WEIGHT;
        }
        if context.flow_type == DocumentFlowType::Notice
            && matches!(
                s.doc_type,
                DocumentType::FourteenDayNotice
                    | DocumentType::EvictionNotice
                    | DocumentType::NoticeToVacate
                    | DocumentType::LeaseViolationNotice
                    | DocumentType::LateRentNotice
            )
        {
            vote += 0.5;
        }
        if context.flow_type == DocumentFlowType::Contract
            && s.doc_type == DocumentType::LeaseAgreement
        {
            vote += 0.5;
        }
        if vote > 0.0 {
            match best {
                Some((_, best_vote, _)) if best_vote >= vote => {}
                _ => best = Some((s.doc_type, vote, s.score)),
            }
        }
    }

    let (doc_type, type_score) = match best {
        Some((doc_type, _, score)) => (doc_type, score),
        None => {
            // Nothing matched: letters degrade to correspondence, the
            // rest stays unknown.
            if context.flow_type == DocumentFlowType::Letter {
                (DocumentType::Correspondence, 0.1)
            } else {
                (DocumentType::Unknown, 0.0)
            }
        }
    };

    chain.record(
        "document_classification",
        format!("classified as {:?}", doc_type),
        scores
            .iter()
            .filter(|s| s.score > 0.0)
            .map(|s| format!("{:?}={:.2}", s.doc_type, s.score))
            .collect(),
        vec![format!("{:?}", doc_type)],
        type_score,
    );

    (doc_type, type_score)
}

/// Parse every validated DATE/DEADLINE entity into the event timeline:
/// dated entries ascending, unparseable ones last.
pub fn build_timeline(
    text: &str,
    entities: &[ExtractedEntity],
    header_len: usize,
    chain: &mut ReasoningChain,
) -> Vec<TimelineEntry> {
    let document_date = entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Date && e.span.start < header_len)
        .find_map(|e| e.attribute("parsed_date").and_then(|d| d.parse().ok()));

    let mut timeline: Vec<TimelineEntry> = Vec::new();
    for entity in entities {
        match entity.entity_type {
            EntityType::Date => {
                let event_date: Option<NaiveDate> = entity
                    .attribute("parsed_date")
                    .and_then(|d| d.parse().ok())
                    .or_else(|| parse_date(&entity.value).ok());
                let kind = classify_event(text, entity, document_date, event_date, header_len);
                timeline.push(TimelineEntry {
                    event_date,
                    event_kind: kind,
                    is_deadline: kind == TimelineEventKind::Deadline,
                    is_court_date: kind == TimelineEventKind::CourtDate,
                    confidence: entity.confidence,
                    source_text: entity.value.clone(),
                });
            }
            EntityType::Deadline => {
                // "within N days" anchors to the document date when one
                // exists; otherwise the entry stays undated but present.
                let event_date = match extract_days(&entity.value) {
                    Some(days) => document_date.map(|d| d + Duration::days(days as i64)),
                    None => embedded_date(&entity.value),
                };
                timeline.push(TimelineEntry {
                    event_date,
                    event_kind: TimelineEventKind::Deadline,
                    is_deadline: true,
                    is_court_date: false,
                    confidence: entity.confidence * 0.9,
                    source_text: entity.value.clone(),
                });
            }
            _ => {}
        }
    }

    timeline.sort_by_key(TimelineEntry::sort_key);

    chain.record(
        "timeline_construction",
        format!(
            "{} events ({} dated)",
            timeline.len(),
            timeline.iter().filter(|t| t.event_date.is_some()).count()
        ),
        entities
            .iter()
            .filter(|e| {
                matches!(e.entity_type, EntityType::Date | EntityType::Deadline)
            })
            .map(|e| e.id.clone())
            .collect(),
        timeline.iter().map(|t| t.source_text.clone()).collect(),
        0.0,
    );

    timeline
}

fn classify_event(
    text: &str,
    entity: &ExtractedEntity,
    document_date: Option<NaiveDate>,
    event_date: Option<NaiveDate>,
    header_len: usize,
) -> TimelineEventKind {
    let window = context_window(text, entity.span, 60).to_lowercase();
    if window.contains("hearing")
        || window.contains("appear")
        || window.contains("trial")
        || window.contains("court date")
    {
        TimelineEventKind::CourtDate
    } else if window.contains("within")
        || window.contains("deadline")
        || window.contains("no later than")
        || window.contains("on or before")
        || window.contains("vacate by")
    {
        TimelineEventKind::Deadline
    } else if window.contains("rent") || window.contains("payment") || window.contains("due") {
        TimelineEventKind::PaymentDate
    } else if entity.span.start < header_len
        && (document_date.is_none() || document_date == event_date)
    {
        TimelineEventKind::DocumentDate
    } else {
        TimelineEventKind::Generic
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shared_types::TextSpan;

    use super::*;

    fn date_entity(id: &str, value: &str, parsed: Option<&str>, start: usize) -> ExtractedEntity {
        let mut e = ExtractedEntity::new(
            id,
            EntityType::Date,
            value,
            0.9,
            "month_name_date",
            TextSpan::new(start, start + value.len()),
        );
        match parsed {
            Some(p) => e.set_attribute("parsed_date", p),
            None => e.valid = false,
        }
        e
    }

    #[test]
    fn hearing_language_marks_a_court_date() {
        let text = "A hearing is scheduled for June 10, 2024 before the referee.";
        let entities = vec![date_entity("ent-1", "June 10, 2024", Some("2024-06-10"), 27)];
        let mut chain = ReasoningChain::new("test");
        let timeline = build_timeline(text, &entities, text.len(), &mut chain);
        assert_eq!(timeline[0].event_kind, TimelineEventKind::CourtDate);
        assert!(timeline[0].is_court_date);
    }

    #[test]
    fn deadline_days_anchor_to_the_document_date() {
        let text = "Dated: January 1, 2024. You must respond within 14 days.";
        let mut deadline = ExtractedEntity::new(
            "ent-2",
            EntityType::Deadline,
            "within 14 days",
            0.85,
            "within_days",
            TextSpan::new(41, 55),
        );
        deadline.set_attribute("days", "14");
        let entities = vec![
            date_entity("ent-1", "January 1, 2024", Some("2024-01-01"), 7),
            deadline,
        ];
        let mut chain = ReasoningChain::new("test");
        let timeline = build_timeline(text, &entities, text.len(), &mut chain);
        let anchored = timeline.iter().find(|t| t.is_deadline).unwrap();
        assert_eq!(
            anchored.event_date,
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn unparsed_dates_sort_after_dated_entries() {
        let text = "February 30, 2024 and then June 10, 2024 hearing.";
        let entities = vec![
            date_entity("ent-1", "February 30, 2024", None, 0),
            date_entity("ent-2", "June 10, 2024", Some("2024-06-10"), 27),
        ];
        let mut chain = ReasoningChain::new("test");
        let timeline = build_timeline(text, &entities, text.len(), &mut chain);
        assert!(timeline[0].event_date.is_some());
        assert!(timeline[1].event_date.is_none());
    }
}
