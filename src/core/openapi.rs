use utoipa::{Modify, OpenApi};

use crate::features::incidents::{dtos as incidents_dtos, handlers as incidents_handlers, models as incidents_models};
use crate::features::places::{dtos as places_dtos, handlers as places_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Places
        places_handlers::search_places,
        // Incidents
        incidents_handlers::create_incident,
        incidents_handlers::list_categories,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Places
            places_dtos::PlaceResponseDto,
            places_dtos::SearchStatus,
            places_dtos::PlaceSearchResponseDto,
            ApiResponse<places_dtos::PlaceSearchResponseDto>,
            // Incidents
            incidents_models::IncidentCategory,
            incidents_dtos::CreateIncidentDto,
            incidents_dtos::IncidentResponseDto,
            incidents_dtos::CategoryResponseDto,
            ApiResponse<incidents_dtos::IncidentResponseDto>,
            ApiResponse<Vec<incidents_dtos::CategoryResponseDto>>,
        )
    ),
    tags(
        (name = "places", description = "Commune search over the reference table"),
        (name = "incidents", description = "STIX incident creation and submission"),
    ),
    info(
        title = "STIX Incident Intake API",
        version = "0.1.0",
        description = "Record located incidents and push them as STIX 2.1 bundles",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
