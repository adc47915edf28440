use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roofline_detect::{AcquisitionRequest, AcquisitionResponse};

use crate::error::failure_status;
use crate::state::AppState;

/// Run the acquisition pipeline. Failures keep the contract's JSON body and
/// map their step to an HTTP status.
pub async fn acquire_outline(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AcquisitionRequest>,
) -> Response {
    tracing::info!(site_id = ?request.site_id, precision = request.precision.as_str(), "Acquiring roof outline");

    let response = state.coordinator.acquire(&request).await;

    let status = match &response {
        AcquisitionResponse::Success(_) => StatusCode::OK,
        AcquisitionResponse::Failure(failure) => failure_status(failure),
    };

    (status, Json(response)).into_response()
}
