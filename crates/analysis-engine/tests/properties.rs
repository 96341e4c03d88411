//! Pipeline-wide invariants: determinism under a fixed date, span and
//! score bounds, and preprocessing idempotence.

use analysis_engine::preprocess;
use analysis_engine::AnalysisEngine;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use proptest::prelude::*;
use shared_types::{AnalysisInput, DocumentAnalysis};

lazy_static! {
    static ref ENGINE: AnalysisEngine = AnalysisEngine::new();
}

fn analyze(text: &str) -> DocumentAnalysis {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    ENGINE.analyze_with_date(
        &AnalysisInput::from_text(text),
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    )
}

/// The run minus its wall-clock field, as comparable JSON.
fn stable_json(mut analysis: DocumentAnalysis) -> serde_json::Value {
    analysis.processing_time_ms = 0;
    serde_json::to_value(&analysis).expect("analysis serializes")
}

const NOTICE: &str = "\
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

/// NOTICE with the date line and signature block removed.
const NOTICE_STRIPPED: &str = "\
14-DAY NOTICE TO PAY RENT OR QUIT

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
";

#[test]
fn identical_input_and_date_give_identical_results() {
    let first = stable_json(analyze(NOTICE));
    let second = stable_json(analyze(NOTICE));
    assert_eq!(first, second);
}

#[test]
fn entity_spans_index_the_normalized_text() {
    for text in [NOTICE, NOTICE_STRIPPED, "Some random text"] {
        let analysis = analyze(text);
        for entity in &analysis.entities {
            assert!(entity.span.start < entity.span.end, "{:?}", entity);
            assert!(
                entity.span.end <= analysis.normalized_text.len(),
                "{:?} overruns text of {} bytes",
                entity,
                analysis.normalized_text.len()
            );
            assert!(analysis.normalized_text.is_char_boundary(entity.span.start));
            assert!((0.0..=1.0).contains(&entity.confidence));
        }
    }
}

#[test]
fn confidence_dimensions_are_bounded_and_convex() {
    for text in [NOTICE, NOTICE_STRIPPED, "Some random text"] {
        let analysis = analyze(text);
        let metrics = &analysis.confidence;
        let mut max_dim: f64 = 0.0;
        for dim in metrics.dimensions() {
            assert!((0.0..=100.0).contains(&dim));
            max_dim = max_dim.max(dim);
        }
        assert!((0.0..=100.0).contains(&metrics.overall_score));
        assert!(
            metrics.overall_score <= max_dim + 1e-9,
            "overall {} exceeds max dimension {}",
            metrics.overall_score,
            max_dim
        );
        assert!((0.0..=100.0).contains(&analysis.legal_analysis.risk_score));
        for issue in &analysis.legal_analysis.issues {
            assert!((0.0..=1.0).contains(&issue.confidence));
        }
    }
}

#[test]
fn removing_structure_never_raises_confidence() {
    let full = analyze(NOTICE);
    let stripped = analyze(NOTICE_STRIPPED);

    assert!(
        stripped.context.structural_clarity <= full.context.structural_clarity,
        "stripped {} vs full {}",
        stripped.context.structural_clarity,
        full.context.structural_clarity
    );
    assert!(
        stripped.confidence.overall_score <= full.confidence.overall_score,
        "stripped {} vs full {}",
        stripped.confidence.overall_score,
        full.confidence.overall_score
    );
}

#[test]
fn preprocessing_cleaned_text_changes_nothing() {
    let noisy = "NOTlCE of evictlon\r\n\r\nYour rnonthly payrnent of $1,2OO.OO is\t\tpast due.\n\n\n\nPay within l4 days.  \n";
    let once = preprocess::preprocess(noisy);
    assert!(!once.corrections.is_empty());

    let twice = preprocess::preprocess(&once.text);
    assert_eq!(twice.text, once.text);
    assert!(
        twice.corrections.is_empty(),
        "second pass still corrected: {:?}",
        twice.corrections
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn arbitrary_text_never_breaks_the_bounds(text in "[ -~\n]{0,400}") {
        let analysis = analyze(&text);
        for entity in &analysis.entities {
            prop_assert!(entity.span.start < entity.span.end);
            prop_assert!(entity.span.end <= analysis.normalized_text.len());
            prop_assert!((0.0..=1.0).contains(&entity.confidence));
        }
        for dim in analysis.confidence.dimensions() {
            prop_assert!((0.0..=100.0).contains(&dim));
        }
        prop_assert!((0.0..=100.0).contains(&analysis.confidence.overall_score));
        prop_assert!((0.0..=100.0).contains(&analysis.legal_analysis.risk_score));
    }

    #[test]
    fn preprocessing_is_idempotent(text in "[ -~\n]{0,400}") {
        let once = preprocess::preprocess(&text);
        let twice = preprocess::preprocess(&once.text);
        prop_assert_eq!(&twice.text, &once.text);
        prop_assert!(twice.corrections.is_empty(), "{:?}", twice.corrections);
    }
}
