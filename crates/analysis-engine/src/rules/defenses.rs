//! Defense identification. Each trigger table is checked on its own; a
//! document can raise several defenses or none.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{DefenseOption, DefenseType};

struct DefenseTrigger {
    defense_type: DefenseType,
    title: &'static str,
    description: &'static str,
    statute: Option<&'static str>,
    confidence: f64,
    pattern: &'static str,
}

static TRIGGERS: &[DefenseTrigger] = &[
    DefenseTrigger {
        defense_type: DefenseType::Retaliation,
        title: "Retaliation",
        description: "The eviction or rent increase follows a tenant complaint; \
                      adverse action within 90 days of a complaint is presumed \
                      retaliatory.",
        statute: Some("Minn. Stat. § 504B.441"),
        confidence: 0.7,
        pattern: r"(?i)(complained|reported\s+to|called\s+the\s+(inspector|city)|retaliat|after\s+you(r)?\s+(complaint|report))",
    },
    DefenseTrigger {
        defense_type: DefenseType::Habitability,
        title: "Breach of habitability",
        description: "Conditions described in the document may breach the \
                      landlord's covenants of fitness and repair.",
        statute: Some("Minn. Stat. § 504B.161"),
        confidence: 0.65,
        pattern: r"(?i)(no\s+heat|no\s+(running\s+)?water|mold|infestation|repairs?\s+(needed|requested|ignored)|unsafe|code\s+violation)",
    },
    DefenseTrigger {
        defense_type: DefenseType::ImproperNotice,
        title: "Improper notice",
        description: "The notice may be defective in form, content, or the \
                      period it grants.",
        statute: Some("Minn. Stat. § 504B.135"),
        confidence: 0.6,
        pattern: r"(?i)(never\s+received|did\s+not\s+receive|improper(ly)?\s+serv|no\s+written\s+notice|notice\s+was\s+not)",
    },
    DefenseTrigger {
        defense_type: DefenseType::PaymentCure,
        title: "Payment and redemption",
        description: "In a nonpayment case the tenant can redeem the tenancy by \
                      paying the rent owed plus costs before the writ issues.",
        statute: Some("Minn. Stat. § 504B.291"),
        confidence: 0.75,
        pattern: r"(?i)(past\s+due\s+rent|nonpayment|pay\s+or\s+(quit|vacate)|rent\s+(owed|owing|in\s+arrears))",
    },
    DefenseTrigger {
        defense_type: DefenseType::Waiver,
        title: "Waiver by acceptance of rent",
        description: "Accepting rent after the claimed breach can waive the \
                      right to evict on that breach.",
        statute: None,
        confidence: 0.55,
        pattern: r"(?i)(accepted\s+(the\s+)?(rent|payment)|cashed\s+(the\s+|my\s+)?check|partial\s+payment\s+(was\s+)?accepted)",
    },
];

lazy_static! {
    static ref COMPILED: Vec<(usize, Regex)> = TRIGGERS
        .iter()
        .enumerate()
        .filter_map(|(i, t)| match Regex::new(t.pattern) {
            Ok(re) => Some((i, re)),
            Err(err) => {
                tracing::warn!(defense = t.title, %err, "skipping bad defense pattern");
                None
            }
        })
        .collect();
}

pub fn identify_defenses(text: &str) -> Vec<DefenseOption> {
    COMPILED
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(i, _)| {
            let t = &TRIGGERS[*i];
            DefenseOption {
                defense_type: t.defense_type,
                title: t.title.to_string(),
                description: t.description.to_string(),
                statute: t.statute.map(String::from),
                confidence: t.confidence,
            }
        })
        .collect()
}
