use serde::{Deserialize, Serialize};

/// Roles a party can hold in a tenancy matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Tenant,
    Landlord,
    PropertyManager,
    Attorney,
    Judge,
    Court,
    Sheriff,
    ProcessServer,
    HousingAuthority,
    CityOffice,
    CollectionAgency,
    Unknown,
}

impl PartyRole {
    /// Whether two roles sit on opposite sides of an eviction matter.
    pub fn is_adverse_to(&self, other: &PartyRole) -> bool {
        matches!(
            (self, other),
            (PartyRole::Tenant, PartyRole::Landlord)
                | (PartyRole::Landlord, PartyRole::Tenant)
                | (PartyRole::Tenant, PartyRole::PropertyManager)
                | (PartyRole::PropertyManager, PartyRole::Tenant)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRelationshipKind {
    LandlordTenant,
    AttorneyClient,
    LegalAdversary,
}

/// Typed edge between two party entities (by entity id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyRelationship {
    pub kind: PartyRelationshipKind,
    pub from_entity: String,
    pub to_entity: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// What a money figure in the document is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountType {
    MonthlyRent,
    RentOwed,
    SecurityDeposit,
    LateFee,
    Damages,
    CourtCosts,
    AttorneyFees,
    TotalOwed,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountRelationship {
    /// Id of the MONEY entity this relationship was derived from.
    pub entity_id: String,
    pub amount: f64,
    pub amount_type: AmountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owed_to: Option<String>,
    pub is_disputed: bool,
    pub may_be_illegal: bool,
}

/// The party/financial/property graph for one analysis run.
///
/// Invariant: every entity id referenced here exists in the same run's
/// entity list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMap {
    pub parties: Vec<String>,
    pub amounts: Vec<String>,
    pub dates: Vec<String>,
    pub addresses: Vec<String>,
    pub party_relationships: Vec<PartyRelationship>,
    pub amount_relationships: Vec<AmountRelationship>,
    /// Entity id of the single best-scored property address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_property: Option<String>,
}

impl RelationshipMap {
    pub fn empty() -> Self {
        Self {
            parties: Vec::new(),
            amounts: Vec::new(),
            dates: Vec::new(),
            addresses: Vec::new(),
            party_relationships: Vec::new(),
            amount_relationships: Vec::new(),
            primary_property: None,
        }
    }

    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.parties
            .iter()
            .chain(self.amounts.iter())
            .chain(self.dates.iter())
            .chain(self.addresses.iter())
            .map(String::as_str)
            .chain(self.party_relationships.iter().flat_map(|r| {
                [r.from_entity.as_str(), r.to_entity.as_str()]
            }))
            .chain(
                self.amount_relationships
                    .iter()
                    .map(|a| a.entity_id.as_str()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_and_landlord_are_adverse() {
        assert!(PartyRole::Tenant.is_adverse_to(&PartyRole::Landlord));
        assert!(!PartyRole::Tenant.is_adverse_to(&PartyRole::Attorney));
    }

    #[test]
    fn references_walks_every_edge() {
        let mut map = RelationshipMap::empty();
        map.parties.push("ent-1".into());
        map.party_relationships.push(PartyRelationship {
            kind: PartyRelationshipKind::LandlordTenant,
            from_entity: "ent-2".into(),
            to_entity: "ent-1".into(),
            confidence: 0.8,
        });
        let refs: Vec<&str> = map.references().collect();
        assert!(refs.contains(&"ent-1"));
        assert!(refs.contains(&"ent-2"));
    }
}
