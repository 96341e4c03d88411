//! Tone and process-direction classification.
//!
//! Two independent weighted-keyword classifiers run over the lowercased
//! text, a sender cascade picks who is speaking, and a small urgency
//! formula combines direction, tone, and the stated response window.
//! This urgency is the communication's pressure reading; the rule
//! engine's deadline urgency is computed separately and the two are not
//! required to agree.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{
    CommunicationFlow, PartyInfo, PartyRole, ProcessDirection, ToneAnalysisResult,
    ToneCategory,
};
use tracing::debug;

use crate::patterns::{self, keyword_hits};

struct WeightedSet<T> {
    category: T,
    weight: f64,
    keywords: &'static [&'static str],
}

static TONE_SETS: &[WeightedSet<ToneCategory>] = &[
    WeightedSet {
        category: ToneCategory::Threatening,
        weight: 3.0,
        keywords: &[
            "or else",
            "you will regret",
            "take action against you",
            "change the locks",
            "shut off",
            "throw you out",
            "remove your belongings",
            "last chance",
        ],
    },
    WeightedSet {
        category: ToneCategory::Hostile,
        weight: 3.0,
        keywords: &["sick of", "fed up", "had enough of you", "your fault", "deadbeat"],
    },
    WeightedSet {
        category: ToneCategory::Demanding,
        weight: 2.0,
        keywords: &[
            "you must",
            "you are required",
            "immediately",
            "demand",
            "pay now",
            "failure to comply",
        ],
    },
    WeightedSet {
        category: ToneCategory::Urgent,
        weight: 2.0,
        keywords: &[
            "urgent",
            "time sensitive",
            "deadline",
            "as soon as possible",
            "without delay",
            "final notice",
        ],
    },
    WeightedSet {
        category: ToneCategory::Warning,
        weight: 1.5,
        keywords: &[
            "this is a warning",
            "be advised",
            "further action",
            "may result in",
            "consequences",
        ],
    },
    WeightedSet {
        category: ToneCategory::FormalLegal,
        weight: 1.5,
        keywords: &[
            "pursuant to",
            "hereby",
            "herein",
            "whereas",
            "notwithstanding",
            "plaintiff",
            "defendant",
            "ordered and adjudged",
        ],
    },
    WeightedSet {
        category: ToneCategory::Conciliatory,
        weight: 1.5,
        keywords: &[
            "work with you",
            "payment plan",
            "understand your situation",
            "happy to discuss",
            "let's resolve",
        ],
    },
    WeightedSet {
        category: ToneCategory::Friendly,
        weight: 1.0,
        keywords: &["hope you are well", "thank you", "best wishes", "appreciate"],
    },
    WeightedSet {
        category: ToneCategory::Informational,
        weight: 1.0,
        keywords: &[
            "for your records",
            "please note",
            "this letter confirms",
            "enclosed",
            "reminder",
        ],
    },
];

static DIRECTION_SETS: &[WeightedSet<ProcessDirection>] = &[
    WeightedSet {
        category: ProcessDirection::Enforcement,
        weight: 3.0,
        keywords: &["writ of recovery", "sheriff will remove", "execution of the writ", "move-out date has been set"],
    },
    WeightedSet {
        category: ProcessDirection::JudgmentEntered,
        weight: 3.0,
        keywords: &["judgment entered", "judgment in favor", "ordered and adjudged", "court has ruled"],
    },
    WeightedSet {
        category: ProcessDirection::HearingScheduled,
        weight: 3.0,
        keywords: &["hearing is scheduled", "appear before", "court date", "appear at the hearing"],
    },
    WeightedSet {
        category: ProcessDirection::CourtFiled,
        weight: 3.0,
        keywords: &["summons", "complaint has been filed", "eviction action", "case number", "you are being sued"],
    },
    WeightedSet {
        category: ProcessDirection::CourtFilingImminent,
        weight: 2.5,
        keywords: &["will file", "prepared to file", "court action will", "legal proceedings will begin"],
    },
    WeightedSet {
        category: ProcessDirection::EvictionStart,
        weight: 2.5,
        keywords: &["notice to vacate", "pay or quit", "terminate your tenancy", "lease is terminated", "must vacate"],
    },
    WeightedSet {
        category: ProcessDirection::FinalWarning,
        weight: 2.0,
        keywords: &["final notice", "final warning", "last opportunity", "before we proceed"],
    },
    WeightedSet {
        category: ProcessDirection::Demand,
        weight: 1.5,
        keywords: &["demand", "pay immediately", "remit payment", "you must pay", "required to pay"],
    },
    WeightedSet {
        category: ProcessDirection::Negotiation,
        weight: 1.5,
        keywords: &["payment plan", "work out", "propose", "counteroffer", "willing to accept"],
    },
    WeightedSet {
        category: ProcessDirection::Settlement,
        weight: 1.5,
        keywords: &["settlement", "agree to resolve", "release of claims", "mutual agreement"],
    },
    WeightedSet {
        category: ProcessDirection::InitialContact,
        weight: 1.0,
        keywords: &["this is to inform", "first notice", "reaching out", "contacting you regarding"],
    },
    WeightedSet {
        category: ProcessDirection::Routine,
        weight: 1.0,
        keywords: &["for your records", "rent receipt", "lease renewal", "routine", "reminder"],
    },
];

lazy_static! {
    static ref DAYS_TO_RESPOND: Regex =
        Regex::new(r"(?i)\bwithin\s+(\d{1,3})\s*days?\b").unwrap();
    static ref TO_LINE: Regex = Regex::new(r"(?im)^to:\s*(.{2,60})$").unwrap();
    static ref DEAR_LINE: Regex =
        Regex::new(r"(?m)Dear\s+([A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+)*)").unwrap();
}

/// Run one weighted classifier: accumulate weight × hits per category,
/// normalize by the best score, return the argmax. A tie between two
/// categories falls back to `default`.
fn classify<T: Copy + PartialEq>(
    text_lower: &str,
    sets: &[WeightedSet<T>],
    default: T,
) -> (T, f64) {
    let scores: Vec<(T, f64)> = sets
        .iter()
        .map(|set| {
            (
                set.category,
                set.weight * keyword_hits(text_lower, set.keywords) as f64,
            )
        })
        .collect();

    let max = scores.iter().map(|(_, s)| *s).fold(0.0f64, f64::max);
    if max <= 0.0 {
        return (default, 0.0);
    }
    let tied = scores.iter().filter(|(_, s)| *s == max).count();
    if tied > 1 {
        return (default, 1.0);
    }
    let winner = scores
        .iter()
        .find(|(_, s)| *s == max)
        .map(|(c, _)| *c)
        .unwrap_or(default);
    (winner, 1.0)
}

/// Ordered sender cascade; the first role whose keywords appear wins and
/// the later checks are skipped.
fn infer_sender(text_lower: &str) -> PartyInfo {
    let cascade: &[(PartyRole, &[&str], f64)] = &[
        (PartyRole::Court, patterns::COURT_KEYWORDS, 0.9),
        (PartyRole::Sheriff, patterns::SHERIFF_KEYWORDS, 0.85),
        (PartyRole::Attorney, patterns::ATTORNEY_KEYWORDS, 0.8),
        (PartyRole::CityOffice, patterns::CITY_KEYWORDS, 0.75),
        (PartyRole::CollectionAgency, patterns::COLLECTION_KEYWORDS, 0.75),
        (PartyRole::Landlord, patterns::LANDLORD_KEYWORDS, 0.6),
        (PartyRole::Tenant, &["i am your tenant", "my landlord", "my lease", "my apartment"], 0.6),
    ];
    for (role, keywords, confidence) in cascade {
        if patterns::contains_any(text_lower, keywords) {
            return PartyInfo::of_role(*role, *confidence);
        }
    }
    PartyInfo::unknown()
}

/// Recipient: an explicit TO:/Dear line names them; the role defaults to
/// whoever the sender would be writing to.
fn infer_recipient(text: &str, sender_role: PartyRole) -> PartyInfo {
    let name = TO_LINE
        .captures(text)
        .or_else(|| DEAR_LINE.captures(text))
        .map(|c| c[1].trim().trim_end_matches([',', ':']).to_string());

    let role = match sender_role {
        PartyRole::Landlord
        | PartyRole::PropertyManager
        | PartyRole::Sheriff
        | PartyRole::CollectionAgency
        | PartyRole::Attorney => PartyRole::Tenant,
        PartyRole::Tenant => PartyRole::Landlord,
        PartyRole::Court | PartyRole::Judge => PartyRole::Unknown,
        _ => PartyRole::Unknown,
    };
    let confidence = if name.is_some() { 0.7 } else { 0.4 };
    PartyInfo {
        name,
        role,
        confidence,
    }
}

fn tone_multiplier(tone: ToneCategory) -> f64 {
    match tone {
        ToneCategory::Threatening | ToneCategory::Hostile => 1.3,
        ToneCategory::Urgent | ToneCategory::Demanding => 1.2,
        ToneCategory::Warning => 1.1,
        ToneCategory::FormalLegal | ToneCategory::Informational | ToneCategory::Neutral => 1.0,
        ToneCategory::Conciliatory | ToneCategory::Friendly => 0.8,
    }
}

fn days_modifier(days: Option<u32>) -> f64 {
    match days {
        Some(0..=3) => 1.3,
        Some(4..=7) => 1.15,
        Some(8..=14) => 1.0,
        Some(_) => 0.9,
        None => 1.0,
    }
}

/// What register a reply should take, given what arrived.
fn recommended_response(tone: ToneCategory, direction: ProcessDirection) -> ToneCategory {
    if matches!(
        direction,
        ProcessDirection::CourtFiled
            | ProcessDirection::HearingScheduled
            | ProcessDirection::JudgmentEntered
            | ProcessDirection::Enforcement
    ) {
        return ToneCategory::FormalLegal;
    }
    match tone {
        ToneCategory::Threatening | ToneCategory::Hostile => ToneCategory::FormalLegal,
        ToneCategory::Demanding | ToneCategory::Urgent | ToneCategory::Warning => {
            ToneCategory::FormalLegal
        }
        ToneCategory::Conciliatory | ToneCategory::Friendly => ToneCategory::Conciliatory,
        ToneCategory::FormalLegal => ToneCategory::FormalLegal,
        ToneCategory::Informational | ToneCategory::Neutral => ToneCategory::Informational,
    }
}

pub fn analyze_tone(text: &str) -> ToneAnalysisResult {
    let text_lower = text.to_lowercase();

    let (primary_tone, _) = classify(&text_lower, TONE_SETS, ToneCategory::Neutral);
    let (primary_direction, _) =
        classify(&text_lower, DIRECTION_SETS, ProcessDirection::Unknown);

    let sender = infer_sender(&text_lower);
    let recipient = infer_recipient(text, sender.role);
    let communication_flow = CommunicationFlow::from_roles(sender.role, recipient.role);

    let days = DAYS_TO_RESPOND
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<u32>().ok())
        .min();
    let urgency_score = (primary_direction.base_urgency()
        * tone_multiplier(primary_tone)
        * days_modifier(days))
    .clamp(0.0, 100.0);

    debug!(?primary_tone, ?primary_direction, urgency_score, "tone analysis complete");

    ToneAnalysisResult {
        primary_tone,
        primary_direction,
        sender,
        recipient,
        communication_flow,
        urgency_score,
        recommended_response_tone: recommended_response(primary_tone, primary_direction),
    }
}
