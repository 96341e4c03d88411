//! Pass 1: pattern-based candidate extraction. Candidates are deduped by
//! (type, value) keeping the highest observed confidence; repetition
//! counts feed the evidence scoring of pass 2.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{EntityType, ReasoningChain, TextSpan};

use crate::relationships::CaptionSide;

#[derive(Debug, Clone)]
pub struct Candidate {
    pub entity_type: EntityType,
    pub value: String,
    pub confidence: f64,
    pub extraction_method: &'static str,
    pub span: TextSpan,
    pub occurrences: usize,
    pub caption_side: Option<CaptionSide>,
}

struct EntityPattern {
    entity_type: EntityType,
    method: &'static str,
    confidence: f64,
    regex: &'static Regex,
}

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December";

lazy_static! {
    static ref CAPTION_VS: Regex = Regex::new(
        r"([A-Z][A-Za-z&',.\- ]{2,50}?)\s*,?\s+vs?\.\s+([A-Z][A-Za-z&',.\- ]{2,50}?)(?:\s*[,\n]|$)"
    )
    .unwrap();
    static ref PLAINTIFF_TAG: Regex =
        Regex::new(r"([A-Z][A-Za-z&',.\- ]{2,50}?)\s*,\s*(?:Plaintiff|Petitioner)\b").unwrap();
    static ref DEFENDANT_TAG: Regex =
        Regex::new(r"([A-Z][A-Za-z&',.\- ]{2,50}?)\s*,\s*(?:Defendant|Respondent)\b").unwrap();
    static ref DEAR_NAME: Regex = Regex::new(
        r"Dear\s+(?:Mr\.|Ms\.|Mrs\.|Dr\.)?\s*([A-Z][a-z]+(?:\s[A-Z][a-z]+)?)"
    )
    .unwrap();
    static ref SIGNOFF_NAME: Regex = Regex::new(
        r"(?m)^(?:Sincerely|Regards|Respectfully(?:\s+submitted)?|Best regards),?\s*\n+\s*([A-Z][a-z]+\s[A-Z][a-z]+)"
    )
    .unwrap();
    static ref GENERIC_NAME: Regex =
        Regex::new(r"\b([A-Z][a-z]{2,}\s[A-Z][a-z]{2,})\b").unwrap();
    static ref ORG_SUFFIX: Regex = Regex::new(
        r"\b([A-Z][A-Za-z&',.\- ]{2,40}?(?:LLC|L\.L\.C\.|Inc\.?|Corp\.?|Company|Properties|Management|Realty|Apartments|Associates))\b"
    )
    .unwrap();
    static ref STREET_ADDRESS: Regex = Regex::new(
        r"\b(\d+\s+[A-Z][A-Za-z ]*?\s(?:Street|St\.?|Avenue|Ave\.?|Road|Rd\.?|Boulevard|Blvd\.?|Drive|Dr\.?|Lane|Ln\.?|Place|Pl\.?|Way)(?:\s*,?\s*(?:Apt\.?|Apartment|Unit|Suite|\#)\s*\#?\s*\w{1,6})?(?:\s*,\s*[A-Z][a-z]+(?:\s[A-Z][a-z]+)?)?(?:\s*,?\s*(?:MN|Minnesota))?(?:\s+\d{5}(?:-\d{4})?)?)"
    )
    .unwrap();
    static ref MONTH_DATE: Regex = Regex::new(&format!(
        r"\b((?:{MONTHS})\s+\d{{1,2}},?\s+\d{{4}})\b"
    ))
    .unwrap();
    static ref NUMERIC_DATE: Regex = Regex::new(r"\b(\d{1,2}/\d{1,2}/\d{2,4})\b").unwrap();
    static ref DAY_OF_DATE: Regex = Regex::new(
        r"(?i)\b(\d{1,2}(?:st|nd|rd|th)?\s+day\s+of\s+[A-Za-z]+,?\s+\d{4})\b"
    )
    .unwrap();
    static ref MONEY: Regex = Regex::new(r"(\$\s?[\d,]+(?:\.\d{1,2})?)").unwrap();
    static ref MN_STATUTE: Regex = Regex::new(
        r"(?i)\b((?:Minn\.?\s*Stat\.?\s*)?(?:§+\s*)?504B\.\d{2,3}[a-z]?)\b"
    )
    .unwrap();
    static ref CASE_NUMBER: Regex =
        Regex::new(r"\b(\d{1,2}-[A-Z]{2}-\d{2}-\d{1,6})\b").unwrap();
    static ref CASE_LABEL: Regex = Regex::new(
        r"(?i)(?:case|court file)\s+no\.?\s*:?\s*([A-Za-z0-9-]{4,20})"
    )
    .unwrap();
    static ref WITHIN_DAYS: Regex = Regex::new(
        r"(?i)\b(within\s+\d{1,3}\s+(?:calendar\s+|business\s+)?days?)\b"
    )
    .unwrap();
    static ref DAY_NOTICE: Regex =
        Regex::new(r"(?i)\b(\d{1,3}[-\s]day\s+notice)\b").unwrap();
    static ref BY_DATE: Regex = Regex::new(&format!(
        r"(?i)\b((?:no later than|on or before)\s+(?:{MONTHS})\s+\d{{1,2}},?\s+\d{{4}})\b"
    ))
    .unwrap();
    static ref PHONE: Regex =
        Regex::new(r"(\(?\d{3}\)?[-. ]\d{3}[-. ]\d{4})\b").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"\b([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})\b").unwrap();
    static ref UNIT_NUMBER: Regex =
        Regex::new(r"(?i)\b(?:apt\.?|apartment|unit|suite)\s*\#?\s*(\w{1,6})\b").unwrap();

    static ref PATTERN_TABLE: Vec<EntityPattern> = vec![
        EntityPattern { entity_type: EntityType::Person, method: "dear_salutation", confidence: 0.75, regex: &DEAR_NAME },
        EntityPattern { entity_type: EntityType::Person, method: "signature_block", confidence: 0.8, regex: &SIGNOFF_NAME },
        EntityPattern { entity_type: EntityType::Person, method: "capitalized_name", confidence: 0.45, regex: &GENERIC_NAME },
        EntityPattern { entity_type: EntityType::Organization, method: "org_suffix", confidence: 0.8, regex: &ORG_SUFFIX },
        EntityPattern { entity_type: EntityType::Address, method: "street_address", confidence: 0.75, regex: &STREET_ADDRESS },
        EntityPattern { entity_type: EntityType::Date, method: "month_name_date", confidence: 0.9, regex: &MONTH_DATE },
        EntityPattern { entity_type: EntityType::Date, method: "numeric_date", confidence: 0.85, regex: &NUMERIC_DATE },
        EntityPattern { entity_type: EntityType::Date, method: "day_of_month_date", confidence: 0.85, regex: &DAY_OF_DATE },
        EntityPattern { entity_type: EntityType::Money, method: "dollar_amount", confidence: 0.9, regex: &MONEY },
        EntityPattern { entity_type: EntityType::Statute, method: "mn_statute", confidence: 0.9, regex: &MN_STATUTE },
        EntityPattern { entity_type: EntityType::CourtCase, method: "case_number", confidence: 0.95, regex: &CASE_NUMBER },
        EntityPattern { entity_type: EntityType::CourtCase, method: "case_label", confidence: 0.8, regex: &CASE_LABEL },
        EntityPattern { entity_type: EntityType::Deadline, method: "within_days", confidence: 0.85, regex: &WITHIN_DAYS },
        EntityPattern { entity_type: EntityType::Deadline, method: "day_notice", confidence: 0.8, regex: &DAY_NOTICE },
        EntityPattern { entity_type: EntityType::Deadline, method: "by_date", confidence: 0.85, regex: &BY_DATE },
        EntityPattern { entity_type: EntityType::Phone, method: "phone_number", confidence: 0.9, regex: &PHONE },
        EntityPattern { entity_type: EntityType::Email, method: "email_address", confidence: 0.95, regex: &EMAIL },
        EntityPattern { entity_type: EntityType::UnitNumber, method: "unit_marker", confidence: 0.8, regex: &UNIT_NUMBER },
    ];
}

/// Words that disqualify a generic capitalized pair as a person name.
const NAME_STOPWORDS: &[&str] = &[
    "Street", "Avenue", "Road", "Boulevard", "Drive", "Lane", "Court", "Place",
    "District", "County", "State", "Minnesota", "Notice", "Lease", "Dear",
    "January", "February", "March", "April", "May", "June", "July", "August",
    "September", "October", "November", "December", "Late", "Total", "Security",
    "Housing", "Judicial", "Case", "Apartment", "Unit",
];

fn looks_like_person(value: &str) -> bool {
    !value
        .split_whitespace()
        .any(|word| NAME_STOPWORDS.contains(&word))
}

fn org_like(value: &str) -> bool {
    ORG_SUFFIX.is_match(value)
}

/// Run every registered pattern and return deduplicated candidates in
/// first-seen order.
pub fn extract_candidates(text: &str, chain: &mut ReasoningChain) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut index: HashMap<(EntityType, String), usize> = HashMap::new();

    let mut push = |candidates: &mut Vec<Candidate>,
                    index: &mut HashMap<(EntityType, String), usize>,
                    entity_type: EntityType,
                    raw: &str,
                    confidence: f64,
                    method: &'static str,
                    span: TextSpan,
                    caption_side: Option<CaptionSide>| {
        let value = raw.trim().trim_end_matches([',', '.', ';']).to_string();
        if value.is_empty() {
            return;
        }
        let key = (entity_type, value.clone());
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut candidates[i];
                existing.occurrences += 1;
                if confidence > existing.confidence {
                    existing.confidence = confidence;
                    existing.extraction_method = method;
                    existing.span = span;
                }
                if existing.caption_side.is_none() {
                    existing.caption_side = caption_side;
                }
            }
            None => {
                index.insert(key, candidates.len());
                candidates.push(Candidate {
                    entity_type,
                    value,
                    confidence,
                    extraction_method: method,
                    span,
                    occurrences: 1,
                    caption_side,
                });
            }
        }
    };

    // Caption parties first: "X v. Y" emits one candidate per capture
    // group, tagged with its side of the caption.
    for caps in CAPTION_VS.captures_iter(text) {
        for (group, side) in [(1, CaptionSide::Left), (2, CaptionSide::Right)] {
            if let Some(m) = caps.get(group) {
                let entity_type = if org_like(m.as_str()) {
                    EntityType::Organization
                } else {
                    EntityType::Person
                };
                push(
                    &mut candidates,
                    &mut index,
                    entity_type,
                    m.as_str(),
                    0.8,
                    "versus_caption",
                    TextSpan::new(m.start(), m.end()),
                    Some(side),
                );
            }
        }
    }
    for (regex, side, method) in [
        (&*PLAINTIFF_TAG, CaptionSide::Left, "plaintiff_tag"),
        (&*DEFENDANT_TAG, CaptionSide::Right, "defendant_tag"),
    ] {
        for caps in regex.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let entity_type = if org_like(m.as_str()) {
                    EntityType::Organization
                } else {
                    EntityType::Person
                };
                push(
                    &mut candidates,
                    &mut index,
                    entity_type,
                    m.as_str(),
                    0.85,
                    method,
                    TextSpan::new(m.start(), m.end()),
                    Some(side),
                );
            }
        }
    }

    for pattern in PATTERN_TABLE.iter() {
        for caps in pattern.regex.captures_iter(text) {
            let m = match caps.get(1) {
                Some(m) => m,
                None => continue,
            };
            if pattern.entity_type == EntityType::Person {
                if org_like(m.as_str()) || !looks_like_person(m.as_str()) {
                    continue;
                }
            }
            push(
                &mut candidates,
                &mut index,
                pattern.entity_type,
                m.as_str(),
                pattern.confidence,
                pattern.method,
                TextSpan::new(m.start(), m.end()),
                None,
            );
        }
    }

    chain.record(
        "pattern_extraction",
        format!("{} candidate entities after dedup", candidates.len()),
        vec![format!("{} chars of text", text.len())],
        candidates
            .iter()
            .map(|c| format!("{}:{}", c.entity_type.label(), c.value))
            .collect(),
        0.0,
    );

    candidates
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shared_types::ReasoningChain;

    use super::*;

    fn extract(text: &str) -> Vec<Candidate> {
        let mut chain = ReasoningChain::new("test");
        extract_candidates(text, &mut chain)
    }

    #[test]
    fn versus_caption_emits_both_sides() {
        let found = extract("Oak Ridge Properties LLC vs. Maria Santos,\nDefendant.");
        let left = found
            .iter()
            .find(|c| c.caption_side == Some(CaptionSide::Left))
            .unwrap();
        let right = found
            .iter()
            .find(|c| c.caption_side == Some(CaptionSide::Right))
            .unwrap();
        assert_eq!(left.entity_type, EntityType::Organization);
        assert_eq!(right.entity_type, EntityType::Person);
        assert_eq!(right.value, "Maria Santos");
    }

    #[test]
    fn duplicate_values_merge_keeping_highest_confidence() {
        let found = extract("Dear Maria Santos, your account... Maria Santos must appear.");
        let santos: Vec<&Candidate> = found
            .iter()
            .filter(|c| c.value == "Maria Santos" && c.entity_type == EntityType::Person)
            .collect();
        assert_eq!(santos.len(), 1);
        assert_eq!(santos[0].confidence, 0.75, "salutation beats generic name");
        assert!(santos[0].occurrences >= 2);
    }

    #[test]
    fn street_names_are_not_people() {
        let found = extract("The premises at 350 Elm Street, Minneapolis, MN 55401.");
        assert!(found
            .iter()
            .all(|c| c.entity_type != EntityType::Person));
        assert!(found
            .iter()
            .any(|c| c.entity_type == EntityType::Address));
    }

    #[test]
    fn money_statute_case_and_deadline_all_fire() {
        let text = "Pursuant to Minn. Stat. 504B.291 you owe $2,550.00. \
                    Case No. 27-CV-24-1234. Respond within 14 days.";
        let found = extract(text);
        let has = |t: EntityType| found.iter().any(|c| c.entity_type == t);
        assert!(has(EntityType::Money));
        assert!(has(EntityType::Statute));
        assert!(has(EntityType::CourtCase));
        assert!(has(EntityType::Deadline));
    }

    #[test]
    fn spans_index_the_source_text() {
        let text = "Contact: tenant@example.org or (612) 555-0137.";
        for c in extract(text) {
            assert!(c.span.start < c.span.end);
            assert!(c.span.end <= text.len());
            assert!(text.is_char_boundary(c.span.start));
        }
    }
}
