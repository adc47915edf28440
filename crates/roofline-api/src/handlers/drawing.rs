use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use roofline_core::models::{DrawingRecord, PixelScale, SiteId};

use super::sites::require_site;
use crate::dto::{DrawingResponse, SaveDrawingRequest};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn save_drawing(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<String>,
    Json(request): Json<SaveDrawingRequest>,
) -> Result<Json<DrawingResponse>, ApiError> {
    let site_id = SiteId::new(site_id);
    require_site(&state, &site_id).await?;

    let scale = request.pixels_per_foot.map(PixelScale::new).unwrap_or(state.default_scale);

    let drawing = DrawingRecord {
        site_id,
        edges: request.edges.iter().map(|edge| edge.to_edge(scale)).collect(),
        alignment: request.alignment,
        scale,
        saved_at: Utc::now(),
    };

    tracing::info!(
        site_id = %drawing.site_id,
        edges = drawing.edges.len(),
        total_ft = drawing.total_length_ft(),
        "Saving drawing"
    );

    state.drawings.save_drawing(&drawing).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to save drawing");
        ApiError::internal("Failed to save drawing").with_details(e.to_string())
    })?;

    Ok(Json(DrawingResponse::from(drawing)))
}

pub async fn get_drawing(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<String>,
) -> Result<Json<DrawingResponse>, ApiError> {
    let site_id = SiteId::new(site_id);

    state
        .drawings
        .get_drawing(&site_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load drawing");
            ApiError::internal("Failed to load drawing").with_details(e.to_string())
        })?
        .map(|drawing| Json(DrawingResponse::from(drawing)))
        .ok_or_else(|| ApiError::not_found("No drawing saved for site").with_details(site_id.to_string()))
}
