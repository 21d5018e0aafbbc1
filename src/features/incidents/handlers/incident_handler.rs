use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::incidents::dtos::{
    CategoryResponseDto, CreateIncidentDto, IncidentResponseDto,
};
use crate::features::incidents::models::IncidentCategory;
use crate::features::incidents::services::IncidentService;
use crate::shared::types::ApiResponse;

/// Create an incident located at a commune and push it to the repository
///
/// Builds a STIX incident, a location and a `located-at` relationship and
/// submits them as one bundle. No retry is attempted on failure.
#[utoipa::path(
    post,
    path = "/api/incidents",
    request_body = CreateIncidentDto,
    responses(
        (status = 201, description = "Bundle imported", body = ApiResponse<IncidentResponseDto>),
        (status = 400, description = "No place selected or malformed body"),
        (status = 502, description = "Repository rejected the bundle")
    ),
    tag = "incidents"
)]
pub async fn create_incident(
    State(service): State<Arc<IncidentService>>,
    AppJson(dto): AppJson<CreateIncidentDto>,
) -> Result<(StatusCode, Json<ApiResponse<IncidentResponseDto>>)> {
    let receipt = service.create(&dto.draft(), dto.place_id()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(receipt.into()),
            Some("Incident et localisation créés avec succès !".to_string()),
            None,
        )),
    ))
}

/// List incident categories
#[utoipa::path(
    get,
    path = "/api/incidents/categories",
    responses(
        (status = 200, description = "Available categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "incidents"
)]
pub async fn list_categories() -> Json<ApiResponse<Vec<CategoryResponseDto>>> {
    let categories = IncidentCategory::ALL.into_iter().map(Into::into).collect();
    Json(ApiResponse::success(Some(categories), None, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::incidents::routes;
    use crate::features::incidents::services::{RecordBuilder, SubmissionService};
    use crate::features::places::services::{PlaceIndex, PlaceSearchService};
    use crate::shared::test_helpers::{FixedClock, StubImporter};
    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::json;

    fn server(importer: StubImporter) -> TestServer {
        let index = PlaceIndex::from_rows(vec![
            ("Paris".to_string(), "75001".to_string()),
            ("Parthenay".to_string(), "79200".to_string()),
        ]);
        let places = Arc::new(PlaceSearchService::new(Arc::new(index)));
        let service = Arc::new(IncidentService::new(
            places,
            RecordBuilder::new(Arc::new(FixedClock(Utc::now()))),
            SubmissionService::new(Arc::new(importer)),
        ));
        TestServer::new(routes::routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_create_incident_returns_repository_result() {
        let server = server(StubImporter::succeeding(json!({"stixBundlePush": true})));

        let response = server
            .post("/api/incidents")
            .json(&json!({
                "title": "Ransomware",
                "category": "Cyber",
                "description": "File server encrypted",
                "pointOfContact": "IT desk",
                "placeId": 1
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<IncidentResponseDto> = response.json();
        let data = body.data.unwrap();
        assert_eq!(data.result, json!({"stixBundlePush": true}));
        assert!(data.incident_id.starts_with("incident--"));
        assert!(data.location_id.starts_with("location--"));
        assert!(data.bundle_id.starts_with("bundle--"));
    }

    #[tokio::test]
    async fn test_create_incident_without_place_is_rejected() {
        let server = server(StubImporter::succeeding(json!({})));

        let response = server
            .post("/api/incidents")
            .json(&json!({ "title": "", "category": "Physique", "description": "" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ApiResponse<()> = response.json();
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_create_incident_reports_repository_message() {
        let server = server(StubImporter::failing("Invalid bundle: unknown type"));

        let response = server
            .post("/api/incidents")
            .json(&json!({ "title": "x", "category": "Organizational", "placeId": 0 }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: ApiResponse<()> = response.json();
        assert_eq!(body.message.as_deref(), Some("Invalid bundle: unknown type"));
    }

    #[tokio::test]
    async fn test_list_categories() {
        let server = server(StubImporter::succeeding(json!({})));

        let response = server.get("/api/incidents/categories").await;
        response.assert_status_ok();

        let body: ApiResponse<Vec<CategoryResponseDto>> = response.json();
        let labels: Vec<String> = body.data.unwrap().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Cyber", "Physique", "Organisationnel"]);
    }
}
