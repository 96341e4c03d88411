//! Generic issue detection: each check is independent and yields zero or
//! more issues with statute, severity, and templated actions.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{AmountRelationship, AmountType, IssueType, LegalIssue, Severity};

use crate::patterns::extract_snippet;

lazy_static! {
    static ref LOCKOUT: Regex = Regex::new(
        r"(?i)\b(change\s+the\s+locks?|change\s+your\s+locks?|changing\s+the\s+locks?|lock\s+you\s+out|locked\s+out|remove\s+your\s+(belongings|property|possessions))"
    )
    .unwrap();
    static ref UTILITY_SHUTOFF: Regex = Regex::new(
        r"(?i)\b(shut\s+off|turn\s+off|disconnect|terminate)\s+(the\s+|your\s+)?(utilities|water|electricity|electric|heat|gas|power)"
    )
    .unwrap();
    static ref RETALIATION: Regex = Regex::new(
        r"(?i)\b(because\s+you\s+(complained|reported|called)|after\s+you(r)?\s+(complaint|report)|retaliat)"
    )
    .unwrap();
    static ref HABITABILITY: Regex = Regex::new(
        r"(?i)\b(no\s+heat|without\s+heat|no\s+(running\s+)?water|mold|infestation|rodents?|cockroach|broken\s+(furnace|window|lock|pipe)|unsafe\s+conditions?|code\s+violation)"
    )
    .unwrap();
}

pub fn detect_issues(text: &str, amounts: &[AmountRelationship]) -> Vec<LegalIssue> {
    let mut issues = Vec::new();

    if let Some(m) = LOCKOUT.find(text) {
        issues.push(LegalIssue {
            issue_type: IssueType::IllegalLockout,
            title: "Threatened or actual lockout".into(),
            description: format!(
                "The document threatens to exclude the tenant without a court \
                 order: {}",
                extract_snippet(text, m.as_str())
            ),
            severity: Severity::Critical,
            statute: Some("Minn. Stat. § 504B.375".into()),
            confidence: 0.9,
            recommended_actions: vec![
                "Do not move out in response to a lockout threat".into(),
                "A lockout requires a court order; petition for emergency \
                 restoration of possession if excluded"
                    .into(),
            ],
            defense_strategies: vec![
                "Unlawful exclusion under Minn. Stat. § 504B.375".into(),
            ],
            deadline_date: None,
            days_to_act: None,
        });
    }

    if let Some(m) = UTILITY_SHUTOFF.find(text) {
        issues.push(LegalIssue {
            issue_type: IssueType::UtilityShutoff,
            title: "Threatened utility shutoff".into(),
            description: format!(
                "The document threatens to cut utilities to force the tenant \
                 out: {}",
                extract_snippet(text, m.as_str())
            ),
            severity: Severity::Critical,
            statute: Some("Minn. Stat. § 504B.375".into()),
            confidence: 0.9,
            recommended_actions: vec![
                "Utility shutoff to force a move-out is unlawful".into(),
                "Document the threat and report it to the city inspector".into(),
            ],
            defense_strategies: vec![
                "Unlawful exclusion under Minn. Stat. § 504B.375".into(),
            ],
            deadline_date: None,
            days_to_act: None,
        });
    }

    if let Some(m) = RETALIATION.find(text) {
        issues.push(LegalIssue {
            issue_type: IssueType::Retaliation,
            title: "Possible retaliation".into(),
            description: format!(
                "The action appears connected to a tenant complaint: {}",
                extract_snippet(text, m.as_str())
            ),
            severity: Severity::High,
            statute: Some("Minn. Stat. § 504B.441".into()),
            confidence: 0.7,
            recommended_actions: vec![
                "Gather records of the complaint and its date".into(),
                "Adverse action within 90 days of a complaint is presumed \
                 retaliatory"
                    .into(),
            ],
            defense_strategies: vec!["Retaliation defense".into()],
            deadline_date: None,
            days_to_act: None,
        });
    }

    if let Some(m) = HABITABILITY.find(text) {
        issues.push(LegalIssue {
            issue_type: IssueType::HabitabilityViolation,
            title: "Habitability problem described".into(),
            description: format!(
                "The document describes conditions that may breach the \
                 covenants of habitability: {}",
                extract_snippet(text, m.as_str())
            ),
            severity: Severity::High,
            statute: Some("Minn. Stat. § 504B.161".into()),
            confidence: 0.65,
            recommended_actions: vec![
                "Request repairs in writing and keep a copy".into(),
                "A rent escrow action can compel repairs".into(),
            ],
            defense_strategies: vec!["Breach of habitability covenants".into()],
            deadline_date: None,
            days_to_act: None,
        });
    }

    for amount in amounts {
        if amount.amount_type == AmountType::LateFee && amount.may_be_illegal {
            issues.push(LegalIssue {
                issue_type: IssueType::IllegalLateFee,
                title: "Late fee exceeds the statutory cap".into(),
                description: format!(
                    "A late fee of ${:.2} appears to exceed 8% of the rent \
                     payment it attaches to.",
                    amount.amount
                ),
                severity: Severity::High,
                statute: Some("Minn. Stat. § 504B.177".into()),
                confidence: 0.75,
                recommended_actions: vec![
                    "Compare the fee against 8% of the overdue rent".into(),
                    "An excessive fee is unenforceable beyond the cap".into(),
                ],
                defense_strategies: vec!["Late fee exceeds Minn. Stat. § 504B.177 cap".into()],
                deadline_date: None,
                days_to_act: None,
            });
        }
    }

    issues
}

/// Required-content check for eviction-adjacent documents: certain fields
/// must be present for the notice to function.
pub fn detect_missing_info(text_lower: &str, is_notice: bool) -> Vec<LegalIssue> {
    if !is_notice {
        return Vec::new();
    }
    let mut missing = Vec::new();
    if !text_lower.contains('$') && !text_lower.contains("rent") {
        missing.push("amount owed");
    }
    if !crate::patterns::contains_any(
        text_lower,
        &["street", "avenue", "ave", "premises", "address", "unit"],
    ) {
        missing.push("premises address");
    }
    if !crate::patterns::contains_any(text_lower, &["by ", "within", "before", "deadline"]) {
        missing.push("response deadline");
    }

    if missing.is_empty() {
        return Vec::new();
    }
    vec![LegalIssue {
        issue_type: IssueType::MissingRequiredInfo,
        title: "Notice is missing required information".into(),
        description: format!("The notice does not state: {}.", missing.join(", ")),
        severity: Severity::Medium,
        statute: None,
        confidence: 0.6,
        recommended_actions: vec![
            "A defective notice may not support a later eviction filing".into(),
        ],
        defense_strategies: vec!["Defective notice".into()],
        deadline_date: None,
        days_to_act: None,
    }]
}
