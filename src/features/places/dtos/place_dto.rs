use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::places::models::Place;
use crate::features::places::services::SearchOutcome;

/// Query parameters for searching places
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PlaceSearchQuery {
    /// Start of a commune name or of a postal code (at least 2 characters)
    #[param(example = "Par")]
    pub q: Option<String>,
}

/// Response DTO for a place
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponseDto {
    /// Selection token to send back when submitting an incident
    pub id: usize,
    pub name: String,
    pub postal_code: String,
    pub label: String,
}

impl From<Place> for PlaceResponseDto {
    fn from(place: Place) -> Self {
        Self {
            label: place.label(),
            id: place.id.0,
            name: place.name,
            postal_code: place.postal_code,
        }
    }
}

/// State of a place search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    TypeMore,
    NoResults,
    Results,
}

/// Response DTO for a place search
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceSearchResponseDto {
    pub status: SearchStatus,
    pub places: Vec<PlaceResponseDto>,
}

impl From<SearchOutcome> for PlaceSearchResponseDto {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::TypeMore => Self {
                status: SearchStatus::TypeMore,
                places: Vec::new(),
            },
            SearchOutcome::NoResults => Self {
                status: SearchStatus::NoResults,
                places: Vec::new(),
            },
            SearchOutcome::Results(places) => Self {
                status: SearchStatus::Results,
                places: places.into_iter().map(Into::into).collect(),
            },
        }
    }
}
