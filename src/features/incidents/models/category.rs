use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed set of incident categories offered by the form
///
/// The French labels shown on the analyst form are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum IncidentCategory {
    Cyber,
    #[serde(alias = "Physique")]
    Physical,
    #[serde(alias = "Organisationnel")]
    Organizational,
}

impl IncidentCategory {
    pub const ALL: [IncidentCategory; 3] = [
        IncidentCategory::Cyber,
        IncidentCategory::Physical,
        IncidentCategory::Organizational,
    ];

    /// Stable English identifier, used as the form and API value
    pub fn label(&self) -> &'static str {
        match self {
            IncidentCategory::Cyber => "Cyber",
            IncidentCategory::Physical => "Physical",
            IncidentCategory::Organizational => "Organizational",
        }
    }

    /// Name shown in the form and carried in the incident's STIX `labels`
    pub fn display_name(&self) -> &'static str {
        match self {
            IncidentCategory::Cyber => "Cyber",
            IncidentCategory::Physical => "Physique",
            IncidentCategory::Organizational => "Organisationnel",
        }
    }

    /// Parse either the label or the French display name
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == raw || c.display_name() == raw)
    }
}
