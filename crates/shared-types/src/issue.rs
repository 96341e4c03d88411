use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Issue severity. Declaration order is the sort order: `Critical`
/// sorts before `Informational`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Informational,
}

/// Closed taxonomy of detectable legal issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    IllegalLockout,
    UtilityShutoff,
    IllegalLateFee,
    Retaliation,
    HabitabilityViolation,
    ImproperNoticePeriod,
    MissingRequiredInfo,
    UpcomingDeadline,
    CourtDateApproaching,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalIssue {
    pub issue_type: IssueType,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statute: Option<String>,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub recommended_actions: Vec<String>,
    pub defense_strategies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_act: Option<i64>,
}

/// Defense theories matched by the trigger-pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseType {
    Retaliation,
    Habitability,
    ImproperNotice,
    PaymentCure,
    Waiver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseOption {
    pub defense_type: DefenseType,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statute: Option<String>,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// One entry of the jurisdiction statute table, echoed into results so
/// callers can show what law applies without holding their own copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatuteReference {
    pub section: String,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Critical,
    High,
    Medium,
    Low,
}

/// Aggregate output of the legal rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalAnalysis {
    pub issues: Vec<LegalIssue>,
    pub applicable_statutes: Vec<StatuteReference>,
    pub defense_options: Vec<DefenseOption>,
    pub urgency_level: UrgencyLevel,
    /// 0–100 weighted issue risk.
    pub risk_score: f64,
}

impl LegalAnalysis {
    pub fn empty() -> Self {
        Self {
            issues: Vec::new(),
            applicable_statutes: Vec::new(),
            defense_options: Vec::new(),
            urgency_level: UrgencyLevel::Low,
            risk_score: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_critical_first() {
        let mut v = vec![Severity::Low, Severity::Critical, Severity::Medium];
        v.sort();
        assert_eq!(v[0], Severity::Critical);
        assert!(Severity::Critical < Severity::Informational);
    }

    #[test]
    fn urgency_serializes_lowercase() {
        let s = serde_json::to_string(&UrgencyLevel::Critical).unwrap();
        assert_eq!(s, "\"critical\"");
    }
}
