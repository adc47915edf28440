use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Sites
        .route("/api/v1/sites/{site_id}", put(handlers::register_site).get(handlers::get_site))

        // Acquisition
        .route("/api/v1/outline", post(handlers::acquire_outline))
        .route("/api/v1/sites/{site_id}/structures", get(handlers::list_structures))
        .route("/api/v1/sites/{site_id}/summary", get(handlers::get_summary))

        // Operator drawings
        .route("/api/v1/sites/{site_id}/drawing", put(handlers::save_drawing).get(handlers::get_drawing))

        .with_state(state)
}
