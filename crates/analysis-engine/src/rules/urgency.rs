//! Deadline urgency. The injected `today` is the pipeline's only
//! wall-clock input; everything downstream of it stays deterministic.

use chrono::NaiveDate;
use shared_types::{IssueType, LegalIssue, Severity, TimelineEntry, UrgencyLevel};

/// Court dates further out than this do not raise a deadline issue.
const COURT_DATE_HORIZON_DAYS: i64 = 7;

/// Issues for the nearest upcoming deadline and any court date inside
/// the horizon.
pub fn deadline_issues(timeline: &[TimelineEntry], today: NaiveDate) -> Vec<LegalIssue> {
    let mut issues = Vec::new();

    let nearest_deadline = timeline
        .iter()
        .filter(|t| t.is_deadline)
        .filter_map(|t| t.event_date.map(|d| (d, t)))
        .filter(|(d, _)| *d >= today)
        .min_by_key(|(d, _)| *d);
    if let Some((date, entry)) = nearest_deadline {
        let days = (date - today).num_days();
        let severity = match days {
            0..=3 => Severity::Critical,
            4..=7 => Severity::High,
            _ => Severity::Medium,
        };
        issues.push(LegalIssue {
            issue_type: IssueType::UpcomingDeadline,
            title: format!("Deadline in {} day{}", days, if days == 1 { "" } else { "s" }),
            description: format!(
                "The document sets a deadline of {} (\"{}\").",
                date.format("%B %-d, %Y"),
                entry.source_text
            ),
            severity,
            statute: None,
            confidence: entry.confidence,
            recommended_actions: vec![
                "Respond before the deadline; missing it narrows your options".into(),
            ],
            defense_strategies: Vec::new(),
            deadline_date: Some(date),
            days_to_act: Some(days),
        });
    }

    let nearest_court = timeline
        .iter()
        .filter(|t| t.is_court_date)
        .filter_map(|t| t.event_date.map(|d| (d, t)))
        .filter(|(d, _)| *d >= today && (*d - today).num_days() <= COURT_DATE_HORIZON_DAYS)
        .min_by_key(|(d, _)| *d);
    if let Some((date, entry)) = nearest_court {
        let days = (date - today).num_days();
        issues.push(LegalIssue {
            issue_type: IssueType::CourtDateApproaching,
            title: format!("Court date in {} day{}", days, if days == 1 { "" } else { "s" }),
            description: format!(
                "A hearing is scheduled for {} (\"{}\"). Failure to appear \
                 usually means a default judgment.",
                date.format("%B %-d, %Y"),
                entry.source_text
            ),
            severity: Severity::Critical,
            statute: None,
            confidence: entry.confidence,
            recommended_actions: vec![
                "Appear at the hearing even without a lawyer".into(),
                "Bring payment records and any written notices received".into(),
            ],
            defense_strategies: Vec::new(),
            deadline_date: Some(date),
            days_to_act: Some(days),
        });
    }

    issues
}

/// Urgency level from the worst issue present plus deadline proximity.
pub fn urgency_level(issues: &[LegalIssue]) -> UrgencyLevel {
    let worst = issues.iter().map(|i| i.severity).min();
    let soonest = issues.iter().filter_map(|i| i.days_to_act).min();

    match (worst, soonest) {
        (Some(Severity::Critical), _) => UrgencyLevel::Critical,
        (_, Some(days)) if days <= 3 => UrgencyLevel::Critical,
        (Some(Severity::High), _) => UrgencyLevel::High,
        (_, Some(days)) if days <= 7 => UrgencyLevel::High,
        (Some(Severity::Medium), _) => UrgencyLevel::Medium,
        (Some(_), _) => UrgencyLevel::Medium,
        (None, _) => UrgencyLevel::Low,
    }
}

/// Weighted 0–100 risk score over all issues.
pub fn risk_score(issues: &[LegalIssue]) -> f64 {
    let total: f64 = issues
        .iter()
        .map(|i| {
            let weight = match i.severity {
                Severity::Critical => 35.0,
                Severity::High => 20.0,
                Severity::Medium => 10.0,
                Severity::Low => 5.0,
                Severity::Informational => 1.0,
            };
            weight * i.confidence
        })
        .sum();
    total.clamp(0.0, 100.0)
}
