use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::places::dtos::{PlaceSearchQuery, PlaceSearchResponseDto};
use crate::features::places::services::PlaceSearchService;
use crate::shared::types::{ApiResponse, Meta};

/// Search communes by name or postal code
///
/// Queries shorter than 2 characters answer `type_more`; a query with no match
/// answers `no_results`.
#[utoipa::path(
    get,
    path = "/api/places/search",
    params(PlaceSearchQuery),
    responses(
        (status = 200, description = "Search outcome", body = ApiResponse<PlaceSearchResponseDto>),
    ),
    tag = "places"
)]
pub async fn search_places(
    State(service): State<Arc<PlaceSearchService>>,
    Query(query): Query<PlaceSearchQuery>,
) -> Result<Json<ApiResponse<PlaceSearchResponseDto>>> {
    let outcome = service.search(query.q.as_deref().unwrap_or_default());
    let message = outcome.notice().map(str::to_string);
    let dto = PlaceSearchResponseDto::from(outcome);
    let meta = Meta {
        total: dto.places.len() as i64,
    };

    Ok(Json(ApiResponse::success(Some(dto), message, Some(meta))))
}
