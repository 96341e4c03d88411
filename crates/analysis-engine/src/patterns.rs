//! Shared keyword tables and proximity helpers used across the pipeline
//! stages. Keyword matching is always done on a lowercased copy of the
//! text; offsets reported to callers refer to the original (normalized)
//! text, which is byte-compatible with its lowercased form for ASCII
//! documents and clamped to character boundaries otherwise.

use shared_types::TextSpan;

/// Words that signal the speaker is a tenant or describes one.
pub const TENANT_KEYWORDS: &[&str] = &[
    "tenant", "tenants", "lessee", "renter", "resident", "occupant",
];

/// Words that signal a landlord/owner party.
pub const LANDLORD_KEYWORDS: &[&str] = &[
    "landlord", "lessor", "owner", "property owner", "landlady",
];

/// Property-management companies and agents.
pub const MANAGER_KEYWORDS: &[&str] = &[
    "property manager",
    "management company",
    "managing agent",
    "property management",
    "leasing office",
];

pub const ATTORNEY_KEYWORDS: &[&str] = &[
    "attorney", "lawyer", "counsel", "law office", "law firm", "esq",
];

pub const JUDGE_KEYWORDS: &[&str] = &["judge", "referee", "the honorable"];

pub const COURT_KEYWORDS: &[&str] = &[
    "district court",
    "housing court",
    "court administrator",
    "judicial district",
    "clerk of court",
];

pub const SHERIFF_KEYWORDS: &[&str] = &["sheriff", "deputy", "civil process"];

pub const PROCESS_SERVER_KEYWORDS: &[&str] =
    &["process server", "personally served", "service of process"];

pub const HOUSING_AUTHORITY_KEYWORDS: &[&str] = &[
    "housing authority",
    "section 8",
    "housing and urban development",
    "hud",
    "public housing",
];

pub const CITY_KEYWORDS: &[&str] = &[
    "city of",
    "code enforcement",
    "housing inspector",
    "inspections department",
];

pub const COLLECTION_KEYWORDS: &[&str] = &[
    "collection agency",
    "debt collector",
    "collections department",
    "this is an attempt to collect a debt",
];

/// Money-context words used by the evidence scorer and amount typing.
pub const MONEY_CONTEXT_KEYWORDS: &[&str] = &[
    "rent", "deposit", "fee", "due", "total", "owed", "balance", "payment",
];

/// Words that mark an amount as contested.
pub const DISPUTE_KEYWORDS: &[&str] = &["dispute", "disputed", "incorrect", "wrong", "contest"];

/// Common legal vocabulary; presence raises the preprocessor's quality
/// score because OCR noise rarely reproduces these intact.
pub const LEGAL_VOCABULARY: &[&str] = &[
    "notice", "lease", "tenant", "landlord", "evict", "eviction", "court",
    "statute", "pursuant", "premises", "rent", "hereby", "terminate",
    "vacate", "summons", "complaint", "plaintiff", "defendant",
];

/// Case-insensitive test for any keyword of a set.
pub fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text_lower.contains(kw))
}

/// How many keyword sets from `groups` appear at least once.
pub fn semantic_cluster_size(text_lower: &str, groups: &[&[&str]]) -> usize {
    groups
        .iter()
        .filter(|group| contains_any(text_lower, group))
        .count()
}

/// Count occurrences of a keyword set, summed over keywords.
pub fn keyword_hits(text_lower: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .map(|kw| text_lower.matches(kw).count())
        .sum()
}

/// Slice a window of `radius` bytes either side of `span`, clamped to the
/// text and snapped outward to char boundaries.
pub fn context_window<'a>(text: &'a str, span: TextSpan, radius: usize) -> &'a str {
    let mut start = span.start.saturating_sub(radius);
    let mut end = (span.end + radius).min(text.len());
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

/// The window strictly before `span`, up to `radius` bytes.
pub fn preceding_window<'a>(text: &'a str, span: TextSpan, radius: usize) -> &'a str {
    let mut start = span.start.saturating_sub(radius);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let end = span.start.min(text.len());
    if start >= end {
        return "";
    }
    &text[start..end]
}

/// Short excerpt around the first occurrence of `needle`, for findings.
pub fn extract_snippet(text: &str, needle: &str) -> String {
    let lower = text.to_lowercase();
    match lower.find(&needle.to_lowercase()) {
        Some(pos) => {
            let span = TextSpan::new(pos, (pos + needle.len()).min(text.len()));
            format!("...{}...", context_window(text, span, 50).trim())
        }
        None => text.chars().take(150).collect(),
    }
}

/// Byte distance between two spans; 0 when they overlap.
pub fn span_distance(a: TextSpan, b: TextSpan) -> usize {
    if a.end <= b.start {
        b.start - a.end
    } else if b.end <= a.start {
        a.start - b.end
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_size_counts_groups_not_words() {
        let text = "the tenant and the other tenant owe rent to the landlord";
        assert_eq!(
            semantic_cluster_size(text, &[TENANT_KEYWORDS, LANDLORD_KEYWORDS, COURT_KEYWORDS]),
            2
        );
    }

    #[test]
    fn preceding_window_stops_at_span_start() {
        let text = "monthly rent of $1,200.00 is due";
        let span = TextSpan::new(16, 25);
        let window = preceding_window(text, span, 50);
        assert!(window.contains("rent"));
        assert!(!window.contains("$"));
    }

    #[test]
    fn span_distance_is_zero_on_overlap() {
        assert_eq!(span_distance(TextSpan::new(0, 5), TextSpan::new(3, 9)), 0);
        assert_eq!(span_distance(TextSpan::new(0, 5), TextSpan::new(9, 12)), 4);
        assert_eq!(span_distance(TextSpan::new(9, 12), TextSpan::new(0, 5)), 4);
    }
}
