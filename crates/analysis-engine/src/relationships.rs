//! Party-role inference and the party/financial/property relationship
//! graph. Role inference is also reused by the reasoner's validation
//! pass, so the keyword scoring lives here in one place.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{
    AmountRelationship, AmountType, EntityType, ExtractedEntity, PartyRelationship,
    PartyRelationshipKind, PartyRole, RelationshipMap, TextSpan,
};

use crate::parse::parse_amount;
use crate::patterns::{
    contains_any, context_window, keyword_hits, span_distance, ATTORNEY_KEYWORDS,
    DISPUTE_KEYWORDS, HOUSING_AUTHORITY_KEYWORDS, JUDGE_KEYWORDS, LANDLORD_KEYWORDS,
    MANAGER_KEYWORDS, PROCESS_SERVER_KEYWORDS, TENANT_KEYWORDS,
};

/// Radius of the role-keyword window around a party's first occurrence.
const ROLE_WINDOW: usize = 100;
/// Default max byte gap for cross-type proximity links.
pub const DEFAULT_PROXIMITY_RADIUS: usize = 200;
/// Minn. Stat. § 504B.177: late fees are capped at 8% of overdue rent.
const LATE_FEE_CAP_RATIO: f64 = 0.08;

/// Which side of a "X v. Y" caption a party appeared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionSide {
    Left,
    Right,
}

lazy_static! {
    static ref LOCATED_AT: Regex =
        Regex::new(r"(?i)\b(?:premises|property|rental|located at|situated at|dwelling)\b")
            .unwrap();
    static ref UNIT_MARKER: Regex =
        Regex::new(r"(?i)\b(?:apt|apartment|unit|suite|#)\s*#?\s*\w{1,6}\b").unwrap();
    static ref MN_ZIP: Regex = Regex::new(r"\b(5[56]\d{3})\b").unwrap();
}

/// Fixed-precedence role keyword table; earlier rows win score ties.
const ROLE_TABLE: &[(PartyRole, &[&str])] = &[
    (PartyRole::Tenant, TENANT_KEYWORDS),
    (PartyRole::Landlord, LANDLORD_KEYWORDS),
    (PartyRole::PropertyManager, MANAGER_KEYWORDS),
    (PartyRole::Attorney, ATTORNEY_KEYWORDS),
    (PartyRole::Judge, JUDGE_KEYWORDS),
    (PartyRole::ProcessServer, PROCESS_SERVER_KEYWORDS),
    (PartyRole::HousingAuthority, HOUSING_AUTHORITY_KEYWORDS),
];

/// Score role keywords in a ±100-char window around the party's first
/// occurrence. A caption side ("X v. Y") is the fallback when keyword
/// evidence is absent: left operand defaults to landlord/plaintiff,
/// right to tenant/defendant.
pub fn infer_party_role(
    text: &str,
    span: TextSpan,
    caption_side: Option<CaptionSide>,
) -> (PartyRole, f64) {
    let window = context_window(text, span, ROLE_WINDOW).to_lowercase();
    let mut best = (PartyRole::Unknown, 0usize);
    for (role, keywords) in ROLE_TABLE {
        let hits = keyword_hits(&window, keywords);
        if hits > best.1 {
            best = (*role, hits);
        }
    }
    if best.1 > 0 {
        let confidence = 0.5 + (best.1 as f64 * 0.15).min(0.4);
        return (best.0, confidence);
    }
    match caption_side {
        Some(CaptionSide::Left) => (PartyRole::Landlord, 0.6),
        Some(CaptionSide::Right) => (PartyRole::Tenant, 0.6),
        None => (PartyRole::Unknown, 0.0),
    }
}

/// Fixed-precedence amount-type table; the first matching context wins.
pub fn classify_amount_context(window_lower: &str) -> AmountType {
    const TABLE: &[(AmountType, &[&str])] = &[
        (
            AmountType::MonthlyRent,
            &["per month", "monthly rent", "rent of", "month's rent", "monthly installment"],
        ),
        (
            AmountType::RentOwed,
            &["rent owed", "rent due", "past due", "back rent", "unpaid rent", "rent in arrears"],
        ),
        (
            AmountType::SecurityDeposit,
            &["security deposit", "damage deposit", "rental deposit", "deposit of"],
        ),
        (AmountType::LateFee, &["late fee", "late charge", "late payment"]),
        (AmountType::Damages, &["damages", "damage to"]),
        (AmountType::CourtCosts, &["court costs", "filing fee", "costs of this action"]),
        (
            AmountType::AttorneyFees,
            &["attorney fees", "attorney's fees", "attorneys' fees", "legal fees"],
        ),
        (AmountType::TotalOwed, &["total", "balance due", "amount due", "sum of"]),
    ];
    for (amount_type, keywords) in TABLE {
        if contains_any(window_lower, keywords) {
            return *amount_type;
        }
    }
    AmountType::Unknown
}

/// Build the relationship graph and write proximity links back onto the
/// entities. Entities must already carry their validated attributes
/// (`role`, `caption_side`).
pub fn map_relationships(
    text: &str,
    entities: &mut [ExtractedEntity],
    proximity_radius: usize,
) -> RelationshipMap {
    let mut map = RelationshipMap::empty();

    for entity in entities.iter() {
        match entity.entity_type {
            EntityType::Person | EntityType::Organization => map.parties.push(entity.id.clone()),
            EntityType::Money => map.amounts.push(entity.id.clone()),
            EntityType::Date | EntityType::Deadline => map.dates.push(entity.id.clone()),
            EntityType::Address => map.addresses.push(entity.id.clone()),
            _ => {}
        }
    }

    map.party_relationships = party_relationships(entities);
    map.amount_relationships = amount_relationships(text, entities);
    map.primary_property = primary_property(text, entities);
    link_by_proximity(entities, proximity_radius);

    map
}

fn role_of(entity: &ExtractedEntity) -> PartyRole {
    match entity.attribute("role") {
        Some("tenant") => PartyRole::Tenant,
        Some("landlord") => PartyRole::Landlord,
        Some("property_manager") => PartyRole::PropertyManager,
        Some("attorney") => PartyRole::Attorney,
        Some("judge") => PartyRole::Judge,
        Some("process_server") => PartyRole::ProcessServer,
        Some("housing_authority") => PartyRole::HousingAuthority,
        _ => PartyRole::Unknown,
    }
}

pub fn role_attribute(role: PartyRole) -> &'static str {
    match role {
        PartyRole::Tenant => "tenant",
        PartyRole::Landlord => "landlord",
        PartyRole::PropertyManager => "property_manager",
        PartyRole::Attorney => "attorney",
        PartyRole::Judge => "judge",
        PartyRole::Court => "court",
        PartyRole::Sheriff => "sheriff",
        PartyRole::ProcessServer => "process_server",
        PartyRole::HousingAuthority => "housing_authority",
        PartyRole::CityOffice => "city_office",
        PartyRole::CollectionAgency => "collection_agency",
        PartyRole::Unknown => "unknown",
    }
}

fn party_relationships(entities: &[ExtractedEntity]) -> Vec<PartyRelationship> {
    let parties: Vec<&ExtractedEntity> = entities
        .iter()
        .filter(|e| {
            matches!(
                e.entity_type,
                EntityType::Person | EntityType::Organization
            )
        })
        .collect();

    let mut edges = Vec::new();

    // Every tenant pairs with every landlord-side party.
    for tenant in parties.iter().filter(|p| role_of(p) == PartyRole::Tenant) {
        for landlord in parties.iter().filter(|p| {
            matches!(role_of(p), PartyRole::Landlord | PartyRole::PropertyManager)
        }) {
            edges.push(PartyRelationship {
                kind: PartyRelationshipKind::LandlordTenant,
                from_entity: landlord.id.clone(),
                to_entity: tenant.id.clone(),
                confidence: (tenant.confidence.min(landlord.confidence)).max(0.5),
            });
        }
    }

    // Attorneys attach to the nearest non-attorney party.
    for attorney in parties.iter().filter(|p| role_of(p) == PartyRole::Attorney) {
        let client = parties
            .iter()
            .filter(|p| p.id != attorney.id && role_of(p) != PartyRole::Attorney)
            .min_by_key(|p| span_distance(attorney.span, p.span));
        if let Some(client) = client {
            edges.push(PartyRelationship {
                kind: PartyRelationshipKind::AttorneyClient,
                from_entity: attorney.id.clone(),
                to_entity: client.id.clone(),
                confidence: 0.6,
            });
        }
    }

    // Caption opponents are legal adversaries.
    let left: Vec<&&ExtractedEntity> = parties
        .iter()
        .filter(|p| p.attribute("caption_side") == Some("left"))
        .collect();
    let right: Vec<&&ExtractedEntity> = parties
        .iter()
        .filter(|p| p.attribute("caption_side") == Some("right"))
        .collect();
    for l in &left {
        for r in &right {
            edges.push(PartyRelationship {
                kind: PartyRelationshipKind::LegalAdversary,
                from_entity: l.id.clone(),
                to_entity: r.id.clone(),
                confidence: 0.8,
            });
        }
    }

    edges
}

/// One deduped MONEY entity can serve several purposes in a document
/// ("$1,200.00 per month" and a "$1,200.00" deposit), so typing is done
/// per text occurrence of the value, then deduplicated by type.
fn amount_relationships(text: &str, entities: &[ExtractedEntity]) -> Vec<AmountRelationship> {
    // Byte-offset-preserving lowercase; occurrence positions index `text`.
    let lower = text.to_ascii_lowercase();
    let first_tenant = entities
        .iter()
        .find(|e| role_of(e) == PartyRole::Tenant)
        .map(|e| e.id.clone());
    let first_landlord = entities
        .iter()
        .find(|e| matches!(role_of(e), PartyRole::Landlord | PartyRole::PropertyManager))
        .map(|e| e.id.clone());

    // Rent figure for the late-fee cap, if one is identifiable.
    let mut monthly_rent: Option<f64> = None;

    let mut relationships: Vec<AmountRelationship> = Vec::new();
    for entity in entities.iter().filter(|e| e.entity_type == EntityType::Money) {
        let amount = match parse_amount(&entity.value) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let needle = entity.value.to_ascii_lowercase();

        let mut search_from = 0usize;
        while let Some(rel_pos) = lower[search_from..].find(&needle) {
            let start = search_from + rel_pos;
            let span = TextSpan::new(start, start + needle.len());
            // Tight window for typing so adjacent clauses ("per month" /
            // "security deposit") do not bleed into each other; wider
            // window for dispute language.
            let type_window = context_window(text, span, 30).to_lowercase();
            let dispute_window = context_window(text, span, ROLE_WINDOW).to_lowercase();
            let amount_type = classify_amount_context(&type_window);

            if amount_type == AmountType::MonthlyRent && monthly_rent.is_none() {
                monthly_rent = Some(amount);
            }

            if !relationships
                .iter()
                .any(|r| r.entity_id == entity.id && r.amount_type == amount_type)
            {
                let owed = matches!(
                    amount_type,
                    AmountType::RentOwed
                        | AmountType::LateFee
                        | AmountType::Damages
                        | AmountType::TotalOwed
                        | AmountType::CourtCosts
                        | AmountType::AttorneyFees
                );
                relationships.push(AmountRelationship {
                    entity_id: entity.id.clone(),
                    amount,
                    amount_type,
                    period: match amount_type {
                        AmountType::MonthlyRent => Some("monthly".to_string()),
                        _ => None,
                    },
                    owed_by: if owed { first_tenant.clone() } else { None },
                    owed_to: if owed { first_landlord.clone() } else { None },
                    is_disputed: contains_any(&dispute_window, DISPUTE_KEYWORDS),
                    may_be_illegal: false,
                });
            }
            search_from = start + needle.len().max(1);
        }
    }

    // Late-fee legality needs the rent figure, which may have been found
    // after the fee in document order.
    if let Some(rent) = monthly_rent {
        let cap = rent * LATE_FEE_CAP_RATIO;
        for rel in relationships
            .iter_mut()
            .filter(|r| r.amount_type == AmountType::LateFee)
        {
            if rel.amount > cap {
                rel.may_be_illegal = true;
            }
        }
    }

    relationships
}

/// Score every ADDRESS and return the single best. Strictly-greater
/// comparison keeps the first occurrence on exact ties.
fn primary_property(text: &str, entities: &[ExtractedEntity]) -> Option<String> {
    let mut best: Option<(&ExtractedEntity, f64)> = None;
    for entity in entities.iter().filter(|e| e.entity_type == EntityType::Address) {
        let window = context_window(text, entity.span, ROLE_WINDOW);
        let mut score = 0.0;
        if LOCATED_AT.is_match(window) {
            score += 2.0;
        }
        // Earlier mention reads as the subject property.
        score += 1.0 - (entity.span.start as f64 / text.len().max(1) as f64);
        if MN_ZIP
            .captures(&entity.value)
            .and_then(|c| c[1].parse::<u32>().ok())
            .map(|zip| (55001..=56763).contains(&zip))
            .unwrap_or(false)
        {
            score += 1.0;
        }
        if UNIT_MARKER.is_match(&entity.value) || UNIT_MARKER.is_match(window) {
            score += 0.5;
        }
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((entity, score)),
        }
    }
    best.map(|(e, _)| e.id.clone())
}

/// Bidirectionally link any two entities of different types within
/// `radius` bytes, independent of the role/relationship logic above.
pub fn link_by_proximity(entities: &mut [ExtractedEntity], radius: usize) {
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            if entities[i].entity_type == entities[j].entity_type {
                continue;
            }
            if span_distance(entities[i].span, entities[j].span) <= radius {
                let id_i = entities[i].id.clone();
                let id_j = entities[j].id.clone();
                entities[i].related_entities.insert(id_j);
                entities[j].related_entities.insert(id_i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shared_types::EntityType;

    use super::*;

    fn entity(
        id: &str,
        entity_type: EntityType,
        value: &str,
        span: TextSpan,
    ) -> ExtractedEntity {
        ExtractedEntity::new(id, entity_type, value, 0.8, "test", span)
    }

    #[test]
    fn role_keywords_beat_caption_defaults() {
        let text = "the tenant, Maria Santos, must vacate";
        let span = TextSpan::new(12, 24);
        let (role, _) = infer_party_role(text, span, Some(CaptionSide::Left));
        assert_eq!(role, PartyRole::Tenant);
    }

    #[test]
    fn caption_side_is_the_fallback() {
        let text = "Oak Ridge Holdings v. Maria Santos";
        let (left, _) = infer_party_role(text, TextSpan::new(0, 17), Some(CaptionSide::Left));
        let (right, _) = infer_party_role(text, TextSpan::new(22, 34), Some(CaptionSide::Right));
        // No tenant/landlord keywords anywhere nearby, so caption wins.
        assert_eq!(left, PartyRole::Landlord);
        assert_eq!(right, PartyRole::Tenant);
    }

    #[test]
    fn one_money_entity_can_be_rent_and_deposit() {
        let text = "Rent is $1,200.00 per month. Tenant shall pay a security deposit of $1,200.00.";
        let mut entities = vec![entity(
            "ent-1",
            EntityType::Money,
            "$1,200.00",
            TextSpan::new(8, 17),
        )];
        let map = map_relationships(text, &mut entities, DEFAULT_PROXIMITY_RADIUS);
        let types: Vec<AmountType> = map
            .amount_relationships
            .iter()
            .map(|r| r.amount_type)
            .collect();
        assert!(types.contains(&AmountType::MonthlyRent));
        assert!(types.contains(&AmountType::SecurityDeposit));
    }

    #[test]
    fn late_fee_above_cap_is_flagged() {
        let text = "Monthly rent of $1,000.00 is due. A late fee of $150.00 applies.";
        let mut entities = vec![
            entity("ent-1", EntityType::Money, "$1,000.00", TextSpan::new(16, 25)),
            entity("ent-2", EntityType::Money, "$150.00", TextSpan::new(48, 55)),
        ];
        let map = map_relationships(text, &mut entities, DEFAULT_PROXIMITY_RADIUS);
        let fee = map
            .amount_relationships
            .iter()
            .find(|r| r.amount_type == AmountType::LateFee)
            .unwrap();
        assert!(fee.may_be_illegal, "150 > 8% of 1000");
    }

    #[test]
    fn disputed_amounts_are_marked() {
        let text = "The stated balance of $900.00 is incorrect and we dispute it.";
        let mut entities = vec![entity(
            "ent-1",
            EntityType::Money,
            "$900.00",
            TextSpan::new(22, 29),
        )];
        let map = map_relationships(text, &mut entities, DEFAULT_PROXIMITY_RADIUS);
        assert!(map.amount_relationships[0].is_disputed);
    }

    #[test]
    fn first_address_wins_score_ties() {
        let text = "At 100 Main Street or 200 Main Street.";
        let mut entities = vec![
            entity("ent-1", EntityType::Address, "100 Main Street", TextSpan::new(3, 18)),
            entity("ent-2", EntityType::Address, "200 Main Street", TextSpan::new(22, 37)),
        ];
        let map = map_relationships(text, &mut entities, DEFAULT_PROXIMITY_RADIUS);
        // Identical context; the earlier one gets the position bonus.
        assert_eq!(map.primary_property.as_deref(), Some("ent-1"));
    }

    #[test]
    fn proximity_links_are_bidirectional_and_cross_type_only() {
        let mut entities = vec![
            entity("ent-1", EntityType::Person, "Maria Santos", TextSpan::new(0, 12)),
            entity("ent-2", EntityType::Money, "$500", TextSpan::new(20, 24)),
            entity("ent-3", EntityType::Person, "John Roe", TextSpan::new(30, 38)),
        ];
        link_by_proximity(&mut entities, DEFAULT_PROXIMITY_RADIUS);
        assert!(entities[0].related_entities.contains("ent-2"));
        assert!(entities[1].related_entities.contains("ent-1"));
        assert!(
            !entities[0].related_entities.contains("ent-3"),
            "same-type pairs are not proximity-linked"
        );
    }
}
