use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::incidents::models::{IncidentCategory, IncidentDraft};
use crate::features::incidents::services::IncidentReceipt;
use crate::features::places::models::PlaceId;

/// Request DTO for creating an incident
///
/// Text fields are not validated; blank values are forwarded as-is.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentDto {
    /// Short title
    #[serde(default)]
    pub title: String,

    /// One of `Cyber`, `Physical`, `Organizational`
    pub category: IncidentCategory,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Point of contact for the incident
    #[serde(default)]
    pub point_of_contact: String,

    /// Place id returned by `/api/places/search`
    pub place_id: Option<usize>,
}

impl CreateIncidentDto {
    pub fn draft(&self) -> IncidentDraft {
        IncidentDraft {
            title: self.title.clone(),
            category: self.category,
            description: self.description.clone(),
            point_of_contact: self.point_of_contact.clone(),
        }
    }

    pub fn place_id(&self) -> Option<PlaceId> {
        self.place_id.map(PlaceId)
    }
}

/// Response DTO for a pushed incident
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncidentResponseDto {
    pub bundle_id: String,
    pub incident_id: String,
    pub location_id: String,
    pub relationship_id: String,
    /// Raw answer of the repository
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
}

impl From<IncidentReceipt> for IncidentResponseDto {
    fn from(receipt: IncidentReceipt) -> Self {
        Self {
            bundle_id: receipt.submission.bundle_id,
            incident_id: receipt.incident_id.to_string(),
            location_id: receipt.location_id.to_string(),
            relationship_id: receipt.relationship_id.to_string(),
            result: receipt.submission.result,
        }
    }
}

/// Response DTO for an incident category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub value: IncidentCategory,
    pub label: String,
}

impl From<IncidentCategory> for CategoryResponseDto {
    fn from(category: IncidentCategory) -> Self {
        Self {
            value: category,
            label: category.display_name().to_string(),
        }
    }
}
