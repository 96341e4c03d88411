//! The immutable pattern/phrase dictionary: canonical legal phrases with
//! variations, weighted document-type signature patterns, and validated
//! critical-number extraction. Built once per engine and shared read-only
//! by every stage.

use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::{DocumentType, Severity, TextSpan};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseCategory {
    NoticeLanguage,
    CourtLanguage,
    TenantRemedy,
    ThreatLanguage,
    FinancialTerm,
    LeaseTerm,
}

/// One canonical legal phrase plus its registered variations.
#[derive(Debug, Clone)]
pub struct LegalPhrase {
    pub canonical: &'static str,
    pub variations: &'static [&'static str],
    pub category: PhraseCategory,
    pub severity: Severity,
    pub statute: Option<&'static str>,
    pub meaning: &'static str,
}

/// A phrase found in the document.
#[derive(Debug, Clone)]
pub struct PhraseMatch {
    pub canonical: &'static str,
    pub category: PhraseCategory,
    pub severity: Severity,
    pub statute: Option<&'static str>,
    pub meaning: &'static str,
    pub matched_text: String,
    pub span: TextSpan,
    /// True when matched through a variation rather than the canonical form.
    pub via_variation: bool,
}

static PHRASES: &[LegalPhrase] = &[
    LegalPhrase {
        canonical: "pay or quit",
        variations: &["pay rent or quit", "pay rent or vacate", "pay or vacate"],
        category: PhraseCategory::NoticeLanguage,
        severity: Severity::High,
        statute: Some("504B.291"),
        meaning: "demand to pay owed rent or surrender the premises",
    },
    LegalPhrase {
        canonical: "notice to vacate",
        variations: &["notice to quit", "notice of termination"],
        category: PhraseCategory::NoticeLanguage,
        severity: Severity::High,
        statute: Some("504B.135"),
        meaning: "notice purporting to end the tenancy",
    },
    LegalPhrase {
        canonical: "unlawful detainer",
        variations: &["eviction action", "action for possession"],
        category: PhraseCategory::CourtLanguage,
        severity: Severity::Critical,
        statute: Some("504B.285"),
        meaning: "court proceeding to recover possession",
    },
    LegalPhrase {
        canonical: "writ of recovery",
        variations: &["writ of restitution", "order to vacate"],
        category: PhraseCategory::CourtLanguage,
        severity: Severity::Critical,
        statute: Some("504B.365"),
        meaning: "order authorizing the sheriff to remove occupants",
    },
    LegalPhrase {
        canonical: "right of redemption",
        variations: &["right to redeem", "redeem the tenancy"],
        category: PhraseCategory::TenantRemedy,
        severity: Severity::Informational,
        statute: Some("504B.291"),
        meaning: "tenant may reinstate by paying rent owed plus costs",
    },
    LegalPhrase {
        canonical: "quiet enjoyment",
        variations: &["peaceful enjoyment"],
        category: PhraseCategory::LeaseTerm,
        severity: Severity::Informational,
        statute: Some("504B.161"),
        meaning: "covenant of undisturbed possession",
    },
    LegalPhrase {
        canonical: "retaliatory eviction",
        variations: &["retaliation for reporting", "retaliatory termination"],
        category: PhraseCategory::TenantRemedy,
        severity: Severity::High,
        statute: Some("504B.441"),
        meaning: "eviction in reprisal for asserting tenant rights",
    },
    LegalPhrase {
        canonical: "emergency tenant remedies",
        variations: &["tenant remedies action", "rent escrow"],
        category: PhraseCategory::TenantRemedy,
        severity: Severity::Medium,
        statute: Some("504B.381"),
        meaning: "expedited relief for loss of essential services",
    },
    LegalPhrase {
        canonical: "security deposit",
        variations: &["damage deposit", "rental deposit"],
        category: PhraseCategory::FinancialTerm,
        severity: Severity::Informational,
        statute: Some("504B.178"),
        meaning: "refundable deposit held against damage or unpaid rent",
    },
    LegalPhrase {
        canonical: "late fee",
        variations: &["late charge", "late payment fee"],
        category: PhraseCategory::FinancialTerm,
        severity: Severity::Low,
        statute: Some("504B.177"),
        meaning: "charge for overdue rent, capped at 8% of the overdue amount",
    },
    LegalPhrase {
        canonical: "change the locks",
        variations: &["changed the locks", "lock you out", "locked out"],
        category: PhraseCategory::ThreatLanguage,
        severity: Severity::Critical,
        statute: Some("504B.375"),
        meaning: "self-help exclusion of a tenant is unlawful",
    },
    LegalPhrase {
        canonical: "shut off utilities",
        variations: &[
            "shut off your utilities",
            "turn off the power",
            "disconnect the water",
            "cut off the heat",
        ],
        category: PhraseCategory::ThreatLanguage,
        severity: Severity::Critical,
        statute: Some("504B.221"),
        meaning: "interruption of essential services by the landlord is unlawful",
    },
];

/// Weighted regex signatures per document type. Scores are normalized by
/// the sum of each type's weights, so types with many patterns do not win
/// by volume alone.
static DOC_TYPE_SIGNATURES: &[(DocumentType, &[(&str, f64)])] = &[
    (
        DocumentType::FourteenDayNotice,
        &[
            (r"(?i)\b(?:14|fourteen)[-\s]day\b", 3.0),
            (r"(?i)\bpay (?:rent )?or (?:quit|vacate)\b", 3.0),
            (r"(?i)\bnonpayment of rent\b", 2.0),
            (r"(?i)\b504B\.291\b", 2.0),
        ],
    ),
    (
        DocumentType::EvictionNotice,
        &[
            (r"(?i)\beviction notice\b", 3.0),
            (r"(?i)\bnotice of eviction\b", 3.0),
            (r"(?i)\bterminat\w* (?:your )?(?:tenancy|lease)\b", 2.0),
            (r"(?i)\bevict\w*\b", 1.0),
        ],
    ),
    (
        DocumentType::NoticeToVacate,
        &[
            (r"(?i)\bnotice to vacate\b", 3.0),
            (r"(?i)\bnotice to quit\b", 3.0),
            (r"(?i)\bvacate the premises\b", 2.0),
        ],
    ),
    (
        DocumentType::LeaseViolationNotice,
        &[
            (r"(?i)\blease violation\b", 3.0),
            (r"(?i)\bbreach of (?:the )?lease\b", 3.0),
            (r"(?i)\bcure (?:the )?violation\b", 2.0),
        ],
    ),
    (
        DocumentType::LateRentNotice,
        &[
            (r"(?i)\bpast[-\s]due rent\b", 3.0),
            (r"(?i)\brent (?:is|was) late\b", 2.0),
            (r"(?i)\blate (?:fee|charge)\b", 1.5),
        ],
    ),
    (
        DocumentType::LeaseAgreement,
        &[
            (r"(?i)\b(?:residential )?lease agreement\b", 3.0),
            (r"(?i)\bterm of (?:the |this )?lease\b", 2.0),
            (r"(?i)\bper month\b", 1.5),
            (r"(?i)\bsecurity deposit\b", 1.0),
            (r"(?i)\blessor\b|\blessee\b", 1.0),
        ],
    ),
    (
        DocumentType::CourtSummons,
        &[
            (r"(?i)\bsummons\b", 3.0),
            (r"(?i)\byou are (?:hereby )?summoned\b", 3.0),
            (r"(?i)\bstate of minnesota\b.{0,80}\bdistrict court\b", 2.0),
        ],
    ),
    (
        DocumentType::CourtComplaint,
        &[
            (r"(?i)\bcomplaint\b", 2.0),
            (r"(?i)\bplaintiff alleges\b", 3.0),
            (r"(?i)\beviction action complaint\b", 3.0),
        ],
    ),
    (
        DocumentType::HearingNotice,
        &[
            (r"(?i)\bnotice of hearing\b", 3.0),
            (r"(?i)\bhearing (?:date|scheduled)\b", 2.5),
            (r"(?i)\bappear (?:in|before the) court\b", 2.0),
        ],
    ),
    (
        DocumentType::Judgment,
        &[
            (r"(?i)\bjudgment (?:is |was )?entered\b", 3.0),
            (r"(?i)\bfindings of fact\b", 2.0),
            (r"(?i)\border of the court\b", 2.0),
        ],
    ),
    (
        DocumentType::WritOfRecovery,
        &[
            (r"(?i)\bwrit of recovery\b", 3.0),
            (r"(?i)\bwrit of restitution\b", 3.0),
            (r"(?i)\bsheriff (?:is|shall be) (?:directed|commanded)\b", 2.0),
        ],
    ),
    (
        DocumentType::DemandLetter,
        &[
            (r"(?i)\bdemand (?:for )?payment\b", 3.0),
            (r"(?i)\bformal demand\b", 2.5),
            (r"(?i)\bremit payment\b", 2.0),
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberKind {
    DeadlineDays,
    Amount,
    CaseNumber,
    ZipCode,
}

/// A validated "critical number": invalid values are retained and
/// flagged, never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalNumber {
    pub kind: NumberKind,
    pub raw: String,
    pub span: TextSpan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<f64>,
    pub valid: bool,
}

/// Normalized document-type score with the patterns that matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocTypeScore {
    pub doc_type: DocumentType,
    /// In [0, 1]: matched weight over the type's maximum possible weight.
    pub score: f64,
    pub matched_patterns: Vec<String>,
}

struct CompiledSignature {
    doc_type: DocumentType,
    patterns: Vec<(Regex, f64)>,
    max_weight: f64,
}

struct NumberPattern {
    kind: NumberKind,
    regex: Regex,
}

/// Immutable dictionary shared by all stages. Construction compiles every
/// pattern once; entries that fail to compile are skipped with a warning
/// rather than failing the build.
pub struct PhraseDictionary {
    signatures: Vec<CompiledSignature>,
    number_patterns: Vec<NumberPattern>,
}

impl PhraseDictionary {
    pub fn new() -> Self {
        let signatures = DOC_TYPE_SIGNATURES
            .iter()
            .map(|(doc_type, table)| {
                let patterns: Vec<(Regex, f64)> = table
                    .iter()
                    .filter_map(|(src, weight)| match Regex::new(src) {
                        Ok(re) => Some((re, *weight)),
                        Err(err) => {
                            warn!(pattern = src, %err, "skipping unusable doc-type pattern");
                            None
                        }
                    })
                    .collect();
                let max_weight = patterns.iter().map(|(_, w)| w).sum();
                CompiledSignature {
                    doc_type: *doc_type,
                    patterns,
                    max_weight,
                }
            })
            .collect();

        let number_sources: &[(NumberKind, &str)] = &[
            (
                NumberKind::DeadlineDays,
                r"(?i)\b(\d{1,3})\s*(?:calendar\s+|business\s+)?days?\b",
            ),
            (NumberKind::Amount, r"\$\s?([\d,]+(?:\.\d{1,2})?)"),
            (NumberKind::CaseNumber, r"\b(\d{1,2}-[A-Z]{2}-\d{2}-\d{1,6})\b"),
            (NumberKind::ZipCode, r"\b(5[0-9]{4})(?:-\d{4})?\b"),
        ];
        let number_patterns = number_sources
            .iter()
            .filter_map(|(kind, src)| match Regex::new(src) {
                Ok(regex) => Some(NumberPattern { kind: *kind, regex }),
                Err(err) => {
                    warn!(pattern = src, %err, "skipping unusable number pattern");
                    None
                }
            })
            .collect();

        Self {
            signatures,
            number_patterns,
        }
    }

    /// Canonical-phrase identification. The canonical form is looked up
    /// first; variations are only consulted when it is absent.
    pub fn identify_phrases(&self, text: &str) -> Vec<PhraseMatch> {
        // ASCII-only lowercasing keeps byte offsets identical to the
        // original text; Unicode lowercasing can change byte lengths
        // (U+0130 becomes two characters) and drift the spans.
        let lower = text.to_ascii_lowercase();
        let mut matches = Vec::new();
        for phrase in PHRASES {
            if let Some(pos) = lower.find(phrase.canonical) {
                matches.push(Self::phrase_match(phrase, text, pos, phrase.canonical, false));
                continue;
            }
            for variation in phrase.variations {
                if let Some(pos) = lower.find(variation) {
                    matches.push(Self::phrase_match(phrase, text, pos, variation, true));
                    break;
                }
            }
        }
        matches
    }

    fn phrase_match(
        phrase: &LegalPhrase,
        text: &str,
        pos: usize,
        matched: &str,
        via_variation: bool,
    ) -> PhraseMatch {
        let end = (pos + matched.len()).min(text.len());
        PhraseMatch {
            canonical: phrase.canonical,
            category: phrase.category,
            severity: phrase.severity,
            statute: phrase.statute,
            meaning: phrase.meaning,
            matched_text: text
                .get(pos..end)
                .unwrap_or(matched)
                .to_string(),
            span: TextSpan::new(pos, end),
            via_variation,
        }
    }

    /// Per-type normalized scores, in the fixed declaration order of the
    /// signature table.
    pub fn score_all_types(&self, text: &str) -> Vec<DocTypeScore> {
        self.signatures
            .iter()
            .map(|sig| {
                let mut matched = Vec::new();
                let mut score = 0.0;
                for (re, weight) in &sig.patterns {
                    if let Some(m) = re.find(text) {
                        score += weight;
                        matched.push(m.as_str().to_string());
                    }
                }
                let normalized = if sig.max_weight > 0.0 {
                    score / sig.max_weight
                } else {
                    0.0
                };
                DocTypeScore {
                    doc_type: sig.doc_type,
                    score: normalized,
                    matched_patterns: matched,
                }
            })
            .collect()
    }

    /// Argmax over signature scores; earlier-declared types win exact
    /// ties. None when nothing matched at all.
    pub fn best_type(&self, text: &str) -> Option<DocTypeScore> {
        self.score_all_types(text)
            .into_iter()
            .filter(|s| s.score > 0.0)
            .fold(None, |best: Option<DocTypeScore>, cand| match best {
                Some(b) if b.score >= cand.score => Some(b),
                _ => Some(cand),
            })
    }

    /// Critical-number extraction with per-kind validation.
    pub fn extract_critical_numbers(&self, text: &str) -> Vec<CriticalNumber> {
        let mut out = Vec::new();
        for np in &self.number_patterns {
            for caps in np.regex.captures_iter(text) {
                let (whole, group) = match (caps.get(0), caps.get(1)) {
                    (Some(w), Some(g)) => (w, g),
                    _ => continue,
                };
                let raw = group.as_str().to_string();
                let span = TextSpan::new(whole.start(), whole.end());
                let (parsed, valid) = Self::validate(np.kind, &raw);
                out.push(CriticalNumber {
                    kind: np.kind,
                    raw,
                    span,
                    parsed,
                    valid,
                });
            }
        }
        out
    }

    fn validate(kind: NumberKind, raw: &str) -> (Option<f64>, bool) {
        match kind {
            NumberKind::DeadlineDays => match raw.parse::<u32>() {
                Ok(days) => (Some(days as f64), days > 0 && days <= 365),
                Err(_) => (None, false),
            },
            NumberKind::Amount => match raw.replace(',', "").parse::<f64>() {
                Ok(v) => (Some(v), v > 0.0 && v < 1_000_000.0),
                Err(_) => (None, false),
            },
            NumberKind::CaseNumber => {
                // County code 1-87 for Minnesota district courts.
                let county_ok = raw
                    .split('-')
                    .next()
                    .and_then(|c| c.parse::<u32>().ok())
                    .map(|c| (1..=87).contains(&c))
                    .unwrap_or(false);
                (None, county_ok)
            }
            NumberKind::ZipCode => match raw.parse::<u32>() {
                Ok(zip) => (Some(zip as f64), (55001..=56763).contains(&zip)),
                Err(_) => (None, false),
            },
        }
    }
}

impl Default for PhraseDictionary {
    fn default() -> Self {
        Self::new()
    }
}
