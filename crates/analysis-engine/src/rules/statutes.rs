//! Minnesota chapter 504B statute knowledge base and notice-period
//! requirements. Static tables, built once.

use shared_types::StatuteReference;

pub struct StatuteEntry {
    pub section: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub provisions: &'static [&'static str],
}

pub static STATUTES: &[StatuteEntry] = &[
    StatuteEntry {
        section: "504B.135",
        title: "Terminating tenancy at will",
        summary: "A tenancy at will may be terminated by written notice at \
                  least as long as the rent interval, not to exceed three months.",
        provisions: &[
            "Notice must be in writing",
            "Notice period equals the interval between rent payments",
        ],
    },
    StatuteEntry {
        section: "504B.161",
        title: "Covenants of landlord or licensor",
        summary: "The landlord covenants that the premises are fit for the use \
                  intended and kept in reasonable repair.",
        provisions: &[
            "Premises fit for intended use",
            "Reasonable repair during the term",
            "Compliance with health and safety codes",
        ],
    },
    StatuteEntry {
        section: "504B.177",
        title: "Late fees",
        summary: "A late fee may not exceed eight percent of the overdue rent \
                  payment and must be agreed to in a written lease.",
        provisions: &[
            "Late fee capped at 8% of overdue rent",
            "Fee must appear in the written lease",
        ],
    },
    StatuteEntry {
        section: "504B.178",
        title: "Interest on security deposits; withholding deposits",
        summary: "Deposits must be returned with interest within three weeks of \
                  tenancy ending, or the landlord owes a penalty.",
        provisions: &[
            "Return within 21 days of termination",
            "Written explanation required for any withholding",
            "Bad-faith withholding doubles the penalty",
        ],
    },
    StatuteEntry {
        section: "504B.285",
        title: "Eviction actions; grounds",
        summary: "Grounds and procedure for eviction actions, including \
                  holdover and breach of lease.",
        provisions: &[
            "Eviction requires a court action",
            "Retaliation is a defense",
        ],
    },
    StatuteEntry {
        section: "504B.291",
        title: "Eviction action for nonpayment; redemption",
        summary: "A tenant may redeem the tenancy by paying rent owed plus \
                  costs before possession is returned to the landlord.",
        provisions: &[
            "Tenant may pay and stay before the writ issues",
            "14-day written notice required before filing for nonpayment",
        ],
    },
    StatuteEntry {
        section: "504B.321",
        title: "Complaint and summons",
        summary: "Form and service requirements for the eviction complaint and \
                  summons, served at least seven days before the hearing.",
        provisions: &[
            "Summons served at least 7 days before hearing",
            "Complaint must state the facts authorizing recovery",
        ],
    },
    StatuteEntry {
        section: "504B.375",
        title: "Unlawful exclusion or removal",
        summary: "A landlord may not exclude a tenant or remove the tenant's \
                  property except through the court process; lockouts are \
                  unlawful.",
        provisions: &[
            "No lockouts or utility shutoffs to force a tenant out",
            "Tenant may petition for immediate restoration of possession",
        ],
    },
    StatuteEntry {
        section: "504B.441",
        title: "Residential tenant may not be penalized for complaint",
        summary: "Retaliation against a tenant for a good-faith complaint to \
                  the landlord or a government agency is prohibited.",
        provisions: &[
            "No eviction or rent increase in retaliation for a complaint",
            "Adverse action within 90 days of a complaint is presumed retaliatory",
        ],
    },
];

pub fn lookup(section: &str) -> Option<&'static StatuteEntry> {
    STATUTES.iter().find(|s| section.contains(s.section))
}

pub fn reference(entry: &StatuteEntry) -> StatuteReference {
    StatuteReference {
        section: format!("Minn. Stat. § {}", entry.section),
        title: entry.title.to_string(),
        summary: entry.summary.to_string(),
    }
}

/// Notice types with statutory minimum periods.
pub struct NoticeRequirement {
    pub notice_type: &'static str,
    /// Keywords that identify the notice type, checked in declaration order.
    pub keywords: &'static [&'static str],
    pub required_days: u32,
    pub statute: &'static str,
    pub required_content: &'static [&'static str],
}

pub static NOTICE_REQUIREMENTS: &[NoticeRequirement] = &[
    NoticeRequirement {
        notice_type: "nonpayment pay-or-quit",
        keywords: &["pay or quit", "pay or vacate", "nonpayment of rent", "past due rent"],
        required_days: 14,
        statute: "504B.291",
        required_content: &["amount of rent owed", "date by which payment is due"],
    },
    NoticeRequirement {
        notice_type: "lease termination",
        keywords: &["notice to vacate", "terminate your tenancy", "termination of lease"],
        required_days: 30,
        statute: "504B.135",
        required_content: &["termination date", "premises address"],
    },
    NoticeRequirement {
        notice_type: "eviction summons",
        keywords: &["summons", "appear before", "eviction action"],
        required_days: 7,
        statute: "504B.321",
        required_content: &["hearing date", "court location", "case number"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_embedded_sections() {
        let entry = lookup("Minn. Stat. 504B.291 subd. 1").unwrap();
        assert_eq!(entry.section, "504B.291");
        assert!(lookup("609.02").is_none());
    }

    #[test]
    fn every_notice_requirement_cites_a_known_statute() {
        for req in NOTICE_REQUIREMENTS {
            assert!(lookup(req.statute).is_some(), "{}", req.statute);
        }
    }
}
