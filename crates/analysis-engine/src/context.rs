//! Structural-element detection and document-flow classification. The
//! context is built once per document and is read-only afterward.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DocumentContext, DocumentFlowType, DocumentSection, SectionKind};

const HEADER_LINES: usize = 20;
const FOOTER_LINES: usize = 10;

lazy_static! {
    static ref DATE_LINE: Regex = Regex::new(
        r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2},?\s+\d{4}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b"
    )
    .unwrap();
    static ref STREET_ADDRESS: Regex = Regex::new(
        r"(?i)\b\d+\s+[A-Za-z][A-Za-z ]*\s(?:street|st|avenue|ave|road|rd|boulevard|blvd|drive|dr|lane|ln|court|ct|place|pl|way)\b\.?"
    )
    .unwrap();
    static ref SALUTATION: Regex =
        Regex::new(r"(?im)^\s*(?:dear\s+\S|to:|to whom it may concern)").unwrap();
    static ref SIGNOFF: Regex = Regex::new(
        r"(?im)^\s*(?:sincerely|regards|respectfully(?:\s+submitted)?|best regards)\b|_{3,}|/s/\s*\S"
    )
    .unwrap();
    static ref NOTARY: Regex = Regex::new(
        r"(?i)\bnotary public\b|\bsworn (?:to )?before me\b|\bsubscribed and sworn\b|\bcommission expires\b"
    )
    .unwrap();
    static ref CASE_CAPTION: Regex = Regex::new(
        r"(?i)\bplaintiffs?\b.{0,200}\bdefendants?\b|\b(?:vs?\.)\s|\bcourt file no\b|\bcase no\b"
    )
    .unwrap();
    static ref COURT_HEADING: Regex =
        Regex::new(r"(?i)\bstate of minnesota\b|\bdistrict court\b|\bjudicial district\b").unwrap();
    static ref LETTERHEAD_ORG: Regex = Regex::new(
        r"(?i)\b(?:llc|inc\.?|company|properties|management|law office|law firm|realty|apartments)\b"
    )
    .unwrap();
    static ref NUMBERED_HEADING: Regex = Regex::new(r"^\s*\d{1,2}[.)]\s+\S").unwrap();
    static ref CAPS_HEADING: Regex = Regex::new(r"^[A-Z][A-Z0-9 :,\-]{5,}$").unwrap();
    static ref KEYWORD_HEADING: Regex = Regex::new(
        r"(?i)^\s*(?:whereas\b|now,? therefore\b|notice\b|demand\b|count\s+(?:i{1,3}|\d)\b)"
    )
    .unwrap();
    static ref FORM_BLANK: Regex = Regex::new(r"_{4,}|\[\s?\]|\(\s?\)\s").unwrap();
}

/// Scan structure, segment sections, classify flow. `ocr_quality` comes
/// from the preprocessor and is carried through unchanged.
pub fn analyze_context(text: &str, ocr_quality: f64) -> DocumentContext {
    if text.trim().is_empty() {
        return DocumentContext::empty();
    }

    let lines: Vec<&str> = text.lines().collect();
    let header = window_text(&lines, 0, HEADER_LINES);
    let footer_start = lines.len().saturating_sub(FOOTER_LINES);
    let footer = window_text(&lines, footer_start, lines.len());

    let has_letterhead = detect_letterhead(&lines);
    let has_date_line = DATE_LINE.is_match(&header);
    let has_address_block = STREET_ADDRESS.is_match(&header) || STREET_ADDRESS.is_match(&footer);
    let has_salutation = SALUTATION.is_match(&header);
    let has_signature_block = SIGNOFF.is_match(&footer);
    let has_notary_block = NOTARY.is_match(text);
    let has_case_caption =
        CASE_CAPTION.is_match(&header) || (COURT_HEADING.is_match(&header) && lines.len() > 3);

    let sections = segment_sections(text);

    let word_count = text.split_whitespace().count();
    let char_count = text.chars().count();
    let sentence_count = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    let avg_word_length = if word_count > 0 {
        text.split_whitespace()
            .map(|w| w.chars().count())
            .sum::<usize>() as f64
            / word_count as f64
    } else {
        0.0
    };

    let mut ctx = DocumentContext {
        has_letterhead,
        has_date_line,
        has_address_block,
        has_salutation,
        has_signature_block,
        has_notary_block,
        has_case_caption,
        flow_type: DocumentFlowType::Unknown,
        word_count,
        char_count,
        sentence_count,
        avg_word_length,
        ocr_quality,
        structural_clarity: 0.0,
        sections,
    };
    ctx.flow_type = classify_flow(text, &ctx);
    ctx.structural_clarity = structural_clarity(&ctx);
    ctx
}

fn window_text(lines: &[&str], start: usize, end: usize) -> String {
    lines[start.min(lines.len())..end.min(lines.len())].join("\n")
}

fn detect_letterhead(lines: &[&str]) -> bool {
    lines.iter().take(5).any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }
        LETTERHEAD_ORG.is_match(trimmed)
            || (trimmed.len() >= 8
                && trimmed.split_whitespace().count() >= 2
                && trimmed
                    .chars()
                    .filter(|c| c.is_alphabetic())
                    .all(|c| c.is_uppercase()))
    })
}

fn segment_sections(text: &str) -> Vec<DocumentSection> {
    let mut headings: Vec<(usize, SectionKind, String)> = Vec::new();
    let mut offset = 0usize;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches('\n');
        let trimmed = content.trim();
        if !trimmed.is_empty() {
            let kind = if NUMBERED_HEADING.is_match(content) {
                Some(SectionKind::NumberedClause)
            } else if CAPS_HEADING.is_match(trimmed) {
                Some(SectionKind::CapitalizedHeader)
            } else if KEYWORD_HEADING.is_match(content) {
                Some(SectionKind::KeywordAnchored)
            } else {
                None
            };
            if let Some(kind) = kind {
                let title: String = trimmed.chars().take(80).collect();
                headings.push((offset, kind, title));
            }
        }
        offset += line.len();
    }

    let mut sections = Vec::with_capacity(headings.len());
    for (i, (start, kind, title)) in headings.iter().enumerate() {
        let end = headings
            .get(i + 1)
            .map(|(next, _, _)| *next)
            .unwrap_or(text.len());
        sections.push(DocumentSection {
            title: title.clone(),
            kind: *kind,
            start: *start,
            end,
        });
    }
    sections
}

/// Weighted flow-type scores; argmax wins, with ties going to the
/// earlier-scored category (legal_filing > letter > form > notice >
/// contract > evidence).
fn classify_flow(text: &str, ctx: &DocumentContext) -> DocumentFlowType {
    let lower = text.to_lowercase();
    let first_lines: String = text.lines().take(3).collect::<Vec<_>>().join("\n");

    let flag = |b: bool| if b { 1.0 } else { 0.0 };

    let legal_filing = 3.0 * flag(ctx.has_case_caption)
        + 2.0 * flag(COURT_HEADING.is_match(text))
        + 1.0 * flag(ctx.has_notary_block);
    let letter = 2.0 * flag(ctx.has_salutation)
        + 2.0 * flag(ctx.has_signature_block)
        + 1.0 * flag(ctx.has_date_line)
        + 1.0 * flag(ctx.has_letterhead);
    let form = (FORM_BLANK.find_iter(text).count() as f64 * 0.75).min(4.0);
    let notice = 3.0 * flag(first_lines.to_lowercase().contains("notice"))
        + 1.0 * flag(lower.contains("you are hereby notified"));
    let contract = 2.0 * flag(lower.contains("agreement") || lower.contains("lease"))
        + 2.0 * flag(
            ctx.sections
                .iter()
                .filter(|s| s.kind == SectionKind::NumberedClause)
                .count()
                >= 3,
        );
    let evidence =
        2.0 * flag(lower.contains("exhibit")) + 1.0 * flag(lower.contains("attachment"));

    let scored = [
        (DocumentFlowType::LegalFiling, legal_filing),
        (DocumentFlowType::Letter, letter),
        (DocumentFlowType::Form, form),
        (DocumentFlowType::Notice, notice),
        (DocumentFlowType::Contract, contract),
        (DocumentFlowType::Evidence, evidence),
    ];

    let mut best = (DocumentFlowType::Unknown, 0.0);
    for (flow, score) in scored {
        if score > best.1 {
            best = (flow, score);
        }
    }
    best.0
}

/// 0–100, monotone in the detected markers: removing a structural cue
/// can only lower this.
fn structural_clarity(ctx: &DocumentContext) -> f64 {
    let marker_part = ctx.structural_marker_count() as f64 / 7.0 * 70.0;
    let section_part = (ctx.sections.len() as f64 * 7.5).min(30.0);
    (marker_part + section_part).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SUMMONS: &str = "STATE OF MINNESOTA                    DISTRICT COURT\n\
        COUNTY OF HENNEPIN                    FOURTH JUDICIAL DISTRICT\n\
        Case No. 27-CV-24-1234\n\
        Oak Ridge Properties LLC, Plaintiff,\n\
        vs.\n\
        Maria Santos, Defendant.\n\
        SUMMONS\n\
        You are hereby summoned to appear.\n";

    const LETTER: &str = "Jan 5, 2024\n\
        Dear Mr. Johnson,\n\
        Your rent payment for January has not been received.\n\
        Please remit payment at your earliest convenience.\n\
        Sincerely,\n\
        Anna Kline\n";

    #[test]
    fn summons_reads_as_legal_filing_with_caption() {
        let ctx = analyze_context(SUMMONS, 80.0);
        assert!(ctx.has_case_caption);
        assert_eq!(ctx.flow_type, DocumentFlowType::LegalFiling);
    }

    #[test]
    fn letter_structure_is_detected() {
        let ctx = analyze_context(LETTER, 80.0);
        assert!(ctx.has_salutation);
        assert!(ctx.has_signature_block);
        assert_eq!(ctx.flow_type, DocumentFlowType::Letter);
    }

    #[test]
    fn empty_text_yields_empty_context() {
        assert_eq!(analyze_context("  ", 0.0), DocumentContext::empty());
    }

    #[test]
    fn numbered_clauses_become_sections() {
        let text = "LEASE AGREEMENT\n1. TERM. The lease runs one year.\n\
                    2. RENT. Rent is $1,200.00 per month.\n3. DEPOSIT. One month's rent.\n";
        let ctx = analyze_context(text, 90.0);
        let numbered = ctx
            .sections
            .iter()
            .filter(|s| s.kind == SectionKind::NumberedClause)
            .count();
        assert_eq!(numbered, 3);
        // Sections tile forward: each ends where the next begins.
        for pair in ctx.sections.windows(2) {
            assert!(pair[0].end <= pair[1].start || pair[0].end == pair[1].start);
        }
    }

    #[test]
    fn removing_cues_never_raises_clarity() {
        let full = analyze_context(LETTER, 80.0);
        let stripped = analyze_context(
            "Your rent payment for January has not been received.\n\
             Please remit payment at your earliest convenience.\n",
            80.0,
        );
        assert!(stripped.structural_clarity <= full.structural_clarity);
    }
}
