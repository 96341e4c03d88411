//! Legal rule engine: statute knowledge base, issue detection, notice
//! compliance, defense identification, and deadline urgency.

mod defenses;
mod issues;
mod notices;
mod statutes;
mod urgency;

pub use statutes::{NOTICE_REQUIREMENTS, STATUTES};

use chrono::NaiveDate;
use shared_types::{
    DocumentCategory, DocumentType, EntityType, ExtractedEntity, LegalAnalysis,
    RelationshipMap, StatuteReference, TimelineEntry,
};
use tracing::debug;

pub fn evaluate(
    text: &str,
    document_type: DocumentType,
    entities: &[ExtractedEntity],
    timeline: &[TimelineEntry],
    relationships: &RelationshipMap,
    today: NaiveDate,
) -> LegalAnalysis {
    let text_lower = text.to_lowercase();

    let mut issues = issues::detect_issues(text, &relationships.amount_relationships);
    issues.extend(notices::check_notice_compliance(text, &text_lower));
    issues.extend(issues::detect_missing_info(
        &text_lower,
        document_type.category() == DocumentCategory::Notice,
    ));
    issues.extend(urgency::deadline_issues(timeline, today));

    // Severity first, then table order within a severity.
    issues.sort_by_key(|i| i.severity);

    let applicable_statutes = collect_statutes(entities, &issues);
    let defense_options = defenses::identify_defenses(text);
    let urgency_level = urgency::urgency_level(&issues);
    let risk_score = urgency::risk_score(&issues);

    debug!(
        issues = issues.len(),
        defenses = defense_options.len(),
        ?urgency_level,
        "rule engine complete"
    );

    LegalAnalysis {
        issues,
        applicable_statutes,
        defense_options,
        urgency_level,
        risk_score,
    }
}

/// Statutes cited by the document itself, then statutes attached to
/// detected issues, deduplicated in that order.
fn collect_statutes(
    entities: &[ExtractedEntity],
    issues: &[shared_types::LegalIssue],
) -> Vec<StatuteReference> {
    let mut refs: Vec<StatuteReference> = Vec::new();
    let mut push = |section: &str| {
        if let Some(entry) = statutes::lookup(section) {
            let reference = statutes::reference(entry);
            if !refs.contains(&reference) {
                refs.push(reference);
            }
        }
    };

    for entity in entities {
        if entity.entity_type == EntityType::Statute {
            push(&entity.value);
        }
    }
    for issue in issues {
        if let Some(statute) = &issue.statute {
            push(statute);
        }
    }
    refs
}
