//! Notice-period compliance: identify the notice type from keywords,
//! read the days the document actually grants, and compare against the
//! statutory minimum.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{IssueType, LegalIssue, Severity};

use super::statutes::{NoticeRequirement, NOTICE_REQUIREMENTS};

lazy_static! {
    static ref STATED_DAYS: Regex =
        Regex::new(r"(?i)\b(?:within\s+)?(\d{1,3})[\s-]*days?\b").unwrap();
}

/// First notice requirement whose keywords appear, in table order.
pub fn identify_notice(text_lower: &str) -> Option<&'static NoticeRequirement> {
    NOTICE_REQUIREMENTS
        .iter()
        .find(|req| req.keywords.iter().any(|kw| text_lower.contains(kw)))
}

/// Smallest day figure the document states; the notice is only as good
/// as its shortest stated window.
pub fn stated_days(text: &str) -> Option<u32> {
    STATED_DAYS
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<u32>().ok())
        .filter(|d| (1..=365).contains(d))
        .min()
}

pub fn check_notice_compliance(text: &str, text_lower: &str) -> Vec<LegalIssue> {
    let Some(req) = identify_notice(text_lower) else {
        return Vec::new();
    };
    let Some(days) = stated_days(text) else {
        return Vec::new();
    };
    if days >= req.required_days {
        return Vec::new();
    }
    vec![LegalIssue {
        issue_type: IssueType::ImproperNoticePeriod,
        title: "Notice period shorter than the statute requires".into(),
        description: format!(
            "This reads as a {} notice, which requires {} days under Minn. \
             Stat. § {}; the document grants only {}.",
            req.notice_type, req.required_days, req.statute, days
        ),
        severity: Severity::High,
        statute: Some(format!("Minn. Stat. § {}", req.statute)),
        confidence: 0.8,
        recommended_actions: vec![
            format!(
                "A {} notice must give at least {} days",
                req.notice_type, req.required_days
            ),
            "An insufficient notice period is a defense to the eviction".into(),
        ],
        defense_strategies: vec!["Improper notice period".into()],
        deadline_date: None,
        days_to_act: None,
    }]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn short_pay_or_quit_notice_is_flagged() {
        let text = "NOTICE: pay or quit. You must pay all past due rent within 5 days.";
        let issues = check_notice_compliance(text, &text.to_lowercase());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::ImproperNoticePeriod);
        assert!(issues[0].description.contains("14 days"));
    }

    #[test]
    fn compliant_notice_passes() {
        let text = "Pay or quit: you have 14 days to pay the past due rent.";
        assert!(check_notice_compliance(text, &text.to_lowercase()).is_empty());
    }

    #[test]
    fn shortest_stated_window_governs() {
        assert_eq!(stated_days("respond within 30 days or 3 days after service"), Some(3));
        assert_eq!(stated_days("no day figures here"), None);
        assert_eq!(stated_days("within 900 days"), None);
    }

    #[test]
    fn notice_type_resolution_uses_table_order() {
        let req = identify_notice("pay or quit and also a summons to appear before").unwrap();
        assert_eq!(req.notice_type, "nonpayment pay-or-quit");
    }
}
