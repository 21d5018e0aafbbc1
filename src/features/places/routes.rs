use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::places::handlers;
use crate::features::places::services::PlaceSearchService;

/// Create routes for the places feature
pub fn routes(service: Arc<PlaceSearchService>) -> Router {
    Router::new()
        .route("/api/places/search", get(handlers::search_places))
        .with_state(service)
}
