//! End-to-end runs over realistic document texts, exercising the whole
//! pipeline through the public engine API.

use analysis_engine::AnalysisEngine;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use shared_types::{
    AmountType, AnalysisInput, DocumentAnalysis, DocumentCategory, DocumentType, EntityType,
    ForgeryType, IssueType, RiskLevel, Severity, UrgencyLevel,
};

fn analyze(text: &str, (y, m, d): (i32, u32, u32)) -> DocumentAnalysis {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let engine = AnalysisEngine::new();
    engine.analyze_with_date(
        &AnalysisInput::from_text(text),
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
    )
}

fn has_role(analysis: &DocumentAnalysis, role: &str) -> bool {
    analysis.entities.iter().any(|e| {
        matches!(e.entity_type, EntityType::Person | EntityType::Organization)
            && e.attribute("role") == Some(role)
    })
}

const PAY_OR_QUIT_NOTICE: &str = "\
14-DAY NOTICE TO PAY RENT OR QUIT

Date: January 5, 2024

To: Maria Santos (Tenant)
350 Elm Street, Apt 2B
Minneapolis, MN 55401

You are hereby notified that rent for the premises listed above is
past due. Pursuant to Minn. Stat. 504B.291, you must pay the total
amount due within 14 days of this notice or vacate the premises.

Rent owed for December 2023: $1,200.00
Rent owed for January 2024: $1,200.00
Late fee for December: $75.00
Late fee for January: $75.00
Total amount due: $2,550.00

From: Oak Ridge Properties LLC (Landlord)
2200 Lake Avenue, Minneapolis, MN 55402

Sincerely,
Robert Miller
";

#[test]
fn pay_or_quit_notice_is_fully_understood() {
    let analysis = analyze(PAY_OR_QUIT_NOTICE, (2024, 1, 10));

    assert!(
        matches!(
            analysis.document_type,
            DocumentType::FourteenDayNotice | DocumentType::EvictionNotice
        ),
        "classified as {:?}",
        analysis.document_type
    );

    let total = analysis
        .relationships
        .amount_relationships
        .iter()
        .find(|r| r.amount_type == AmountType::TotalOwed)
        .expect("total owed identified");
    assert_eq!(total.amount, 2550.0);

    assert!(
        !analysis.legal_analysis.applicable_statutes.is_empty(),
        "cited statute carried into the analysis"
    );
    assert!(analysis
        .legal_analysis
        .applicable_statutes
        .iter()
        .any(|s| s.section.contains("504B.291")));

    assert!(has_role(&analysis, "tenant"));
    assert!(has_role(&analysis, "landlord"));

    // Listed amounts account for the stated total (each rent and fee
    // appears twice), so the amount cross-check stays quiet.
    if let Some(hw) = &analysis.handwriting_analysis {
        assert!(!hw
            .forgery_indicators
            .iter()
            .any(|i| i.forgery_type == ForgeryType::AmountMismatch));
    }
}

const SUMMONS: &str = "\
STATE OF MINNESOTA                                DISTRICT COURT
COUNTY OF HENNEPIN                      FOURTH JUDICIAL DISTRICT

Oak Ridge Properties LLC vs. Maria Santos

Case No. 27-CV-24-1234

                            SUMMONS

THE STATE OF MINNESOTA TO THE ABOVE-NAMED DEFENDANT:

1. You are hereby summoned to answer the complaint of the plaintiff
in this eviction action and to appear before the district court at
300 Summit Avenue, Minneapolis, MN 55487.

2. Your written answer must be served within 7 days of service of
this summons upon you.

Dated: 1/15/2024

Respectfully submitted,
James Carter
Attorney for Plaintiff
";

#[test]
fn summons_builds_a_court_filing_with_adversaries() {
    let analysis = analyze(SUMMONS, (2024, 1, 20));

    assert_eq!(analysis.document_category, DocumentCategory::CourtFiling);
    assert!(analysis.context.has_case_caption);

    let case = analysis
        .entities
        .iter()
        .find(|e| e.entity_type == EntityType::CourtCase)
        .expect("case number extracted");
    assert!(case.value.contains("27-CV-24-1234"));

    assert!(!analysis.relationships.party_relationships.is_empty());
    assert!(has_role(&analysis, "tenant"));
    assert!(has_role(&analysis, "landlord"));
}

const LEASE: &str = "\
RESIDENTIAL LEASE AGREEMENT

1. LANDLORD. The landlord is Oak Ridge Properties LLC, with offices
at 2200 Lake Avenue, Minneapolis, MN 55405. Rent payments are
delivered to the landlord at that address.

2. TENANT. The tenant is Maria Santos.

3. PREMISES. The premises are located at 350 Elm Street, Apt 2B,
Minneapolis, MN 55401.

4. RENT. Tenant shall pay rent of $1,200.00 per month, due on the
first day of each month.

5. SECURITY DEPOSIT. Tenant shall pay a security deposit of
$1,200.00 upon signing this lease.

6. TERM. The term of this lease is twelve months beginning
March 1, 2024.
";

#[test]
fn lease_separates_rent_from_deposit() {
    let analysis = analyze(LEASE, (2024, 3, 10));

    assert_eq!(analysis.document_type, DocumentType::LeaseAgreement);

    let rent = analysis
        .relationships
        .amount_relationships
        .iter()
        .find(|r| r.amount_type == AmountType::MonthlyRent)
        .expect("monthly rent typed");
    assert_eq!(rent.amount, 1200.0);
    assert_eq!(rent.period.as_deref(), Some("monthly"));

    let deposit = analysis
        .relationships
        .amount_relationships
        .iter()
        .find(|r| r.amount_type == AmountType::SecurityDeposit)
        .expect("security deposit typed");
    assert_eq!(deposit.amount, 1200.0);

    assert!(has_role(&analysis, "tenant"));
    assert!(has_role(&analysis, "landlord"));
}

const LOCKOUT_EMAIL: &str = "\
From: bob@lakesidemgmt.example.com
To: maria.santos@example.com
Subject: last warning

Maria, you still have not paid this month. If I do not have my money
by Friday I will change the locks and shut off your electricity. Do
not make me do this.

Bob
";

#[test]
fn lockout_threat_in_an_email_is_critical() {
    let analysis = analyze(LOCKOUT_EMAIL, (2024, 2, 1));

    let lockout = analysis
        .legal_analysis
        .issues
        .iter()
        .find(|i| i.issue_type == IssueType::IllegalLockout)
        .expect("lockout threat detected");
    assert_eq!(lockout.severity, Severity::Critical);

    assert!(analysis
        .legal_analysis
        .issues
        .iter()
        .any(|i| i.issue_type == IssueType::UtilityShutoff));

    assert!(matches!(
        analysis.legal_analysis.urgency_level,
        UrgencyLevel::Critical | UrgencyLevel::High
    ));
    assert!(analysis.legal_analysis.risk_score > 0.0);
}

#[test]
fn unstructured_text_scores_below_a_real_notice() {
    let notice = analyze(PAY_OR_QUIT_NOTICE, (2024, 1, 10));
    let noise = analyze("Some random text", (2024, 1, 10));

    assert!(
        noise.confidence.overall_score < notice.confidence.overall_score,
        "noise {} vs notice {}",
        noise.confidence.overall_score,
        notice.confidence.overall_score
    );
    assert!(!noise.confidence.missing_information.is_empty());
}

#[test]
fn repeated_signature_blocks_raise_a_forgery_indicator() {
    let text = "\
RENT RECEIPT

Received from Maria Santos the sum of $400.00 toward February rent.

Signed: Robert Miller

Received the remaining balance of $400.00 the same week.

Signed: Robert Miller
";
    let analysis = analyze(text, (2024, 2, 20));

    let hw = analysis
        .handwriting_analysis
        .expect("signatures found, so handwriting analysis is present");
    let dup = hw
        .forgery_indicators
        .iter()
        .find(|i| i.forgery_type == ForgeryType::DuplicateSignature)
        .expect("byte-identical signatures flagged");
    assert!(dup.risk_level >= RiskLevel::Medium);
    assert_eq!(dup.evidence.len(), 2);
}
