use serde::{Deserialize, Serialize};

use crate::relationships::PartyRole;

/// Communication tone taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneCategory {
    Threatening,
    Demanding,
    Urgent,
    Warning,
    Informational,
    FormalLegal,
    Hostile,
    Conciliatory,
    Friendly,
    Neutral,
}

/// Where along the eviction-process escalation sequence a document sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessDirection {
    InitialContact,
    Demand,
    FinalWarning,
    EvictionStart,
    CourtFilingImminent,
    CourtFiled,
    HearingScheduled,
    JudgmentEntered,
    Enforcement,
    // Non-escalating branches
    Negotiation,
    Settlement,
    Routine,
    Unknown,
}

impl ProcessDirection {
    /// Base urgency contribution, before tone and deadline modifiers.
    pub fn base_urgency(&self) -> f64 {
        match self {
            ProcessDirection::Enforcement => 95.0,
            ProcessDirection::JudgmentEntered => 90.0,
            ProcessDirection::HearingScheduled => 85.0,
            ProcessDirection::CourtFiled => 80.0,
            ProcessDirection::CourtFilingImminent => 75.0,
            ProcessDirection::EvictionStart => 70.0,
            ProcessDirection::FinalWarning => 60.0,
            ProcessDirection::Demand => 45.0,
            ProcessDirection::InitialContact => 25.0,
            ProcessDirection::Negotiation => 30.0,
            ProcessDirection::Settlement => 20.0,
            ProcessDirection::Routine => 15.0,
            ProcessDirection::Unknown => 20.0,
        }
    }
}

/// Sender or recipient of the communication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: PartyRole,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

impl PartyInfo {
    pub fn unknown() -> Self {
        Self {
            name: None,
            role: PartyRole::Unknown,
            confidence: 0.0,
        }
    }

    pub fn of_role(role: PartyRole, confidence: f64) -> Self {
        Self {
            name: None,
            role,
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationFlow {
    LandlordToTenant,
    TenantToLandlord,
    AttorneyToTenant,
    CourtToParty,
    SheriffToTenant,
    GovernmentToParty,
    CollectionToTenant,
    Unknown,
}

impl CommunicationFlow {
    /// Fixed lookup keyed by (sender role, recipient role).
    pub fn from_roles(sender: PartyRole, recipient: PartyRole) -> Self {
        match (sender, recipient) {
            (PartyRole::Landlord | PartyRole::PropertyManager, PartyRole::Tenant) => {
                CommunicationFlow::LandlordToTenant
            }
            (PartyRole::Tenant, PartyRole::Landlord | PartyRole::PropertyManager) => {
                CommunicationFlow::TenantToLandlord
            }
            (PartyRole::Attorney, PartyRole::Tenant) => CommunicationFlow::AttorneyToTenant,
            (PartyRole::Court | PartyRole::Judge, _) => CommunicationFlow::CourtToParty,
            (PartyRole::Sheriff | PartyRole::ProcessServer, PartyRole::Tenant) => {
                CommunicationFlow::SheriffToTenant
            }
            (PartyRole::CityOffice | PartyRole::HousingAuthority, _) => {
                CommunicationFlow::GovernmentToParty
            }
            (PartyRole::CollectionAgency, PartyRole::Tenant) => {
                CommunicationFlow::CollectionToTenant
            }
            _ => CommunicationFlow::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneAnalysisResult {
    pub primary_tone: ToneCategory,
    pub primary_direction: ProcessDirection,
    pub sender: PartyInfo,
    pub recipient: PartyInfo,
    pub communication_flow: CommunicationFlow,
    /// 0–100.
    pub urgency_score: f64,
    pub recommended_response_tone: ToneCategory,
}

impl ToneAnalysisResult {
    pub fn neutral() -> Self {
        Self {
            primary_tone: ToneCategory::Neutral,
            primary_direction: ProcessDirection::Unknown,
            sender: PartyInfo::unknown(),
            recipient: PartyInfo::unknown(),
            communication_flow: CommunicationFlow::Unknown,
            urgency_score: 0.0,
            recommended_response_tone: ToneCategory::Informational,
        }
    }
}
