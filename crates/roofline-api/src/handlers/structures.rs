use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use geojson::FeatureCollection;
use roofline_core::models::{SiteAggregate, SiteId};
use roofline_geo::structures_to_feature_collection;

use super::sites::require_site;
use crate::error::ApiError;
use crate::state::AppState;

/// Stored structures of a site as a GeoJSON FeatureCollection
pub async fn list_structures(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<String>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let site_id = SiteId::new(site_id);
    require_site(&state, &site_id).await?;

    let records = state.structures.list_structures(&site_id).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list structures");
        ApiError::internal("Failed to list structures").with_details(e.to_string())
    })?;

    tracing::debug!(site_id = %site_id, count = records.len(), "Listing structures");

    Ok(Json(structures_to_feature_collection(&records)))
}

pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<String>,
) -> Result<Json<SiteAggregate>, ApiError> {
    let site_id = SiteId::new(site_id);

    state
        .structures
        .get_aggregate(&site_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load aggregate");
            ApiError::internal("Failed to load summary").with_details(e.to_string())
        })?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No outline stored for site").with_details(site_id.to_string()))
}
