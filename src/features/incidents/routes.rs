use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::incidents::handlers;
use crate::features::incidents::services::IncidentService;

/// Create routes for the incidents feature
pub fn routes(service: Arc<IncidentService>) -> Router {
    Router::new()
        .route("/api/incidents", post(handlers::create_incident))
        .route("/api/incidents/categories", get(handlers::list_categories))
        .with_state(service)
}
