use axum::{routing::get, Router};

use crate::features::form::handlers::{self, FormContext};

/// Create routes for the incident page
pub fn routes(context: FormContext) -> Router {
    Router::new()
        .route("/", get(handlers::show_form).post(handlers::submit_form))
        .with_state(context)
}
