use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use roofline_core::models::{GeoPoint, Site, SiteId};

use crate::dto::RegisterSiteRequest;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn register_site(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<String>,
    Json(request): Json<RegisterSiteRequest>,
) -> Result<Json<Site>, ApiError> {
    tracing::info!(site_id = %site_id, name = %request.name, "Registering site");

    let site_id = site_id.trim();
    if site_id.is_empty() {
        return Err(ApiError::bad_request("Site id must not be empty"));
    }

    let location = GeoPoint::new(request.lng, request.lat);
    if !location.is_valid() {
        return Err(ApiError::bad_request("Invalid site location")
            .with_details(format!("lng={}, lat={}", request.lng, request.lat)));
    }

    let mut site = Site::new(SiteId::new(site_id), request.name, location);
    site.address = request.address;

    state.sites.put_site(&site).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to store site");
        ApiError::internal("Failed to store site").with_details(e.to_string())
    })?;

    Ok(Json(site))
}

pub async fn get_site(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<String>,
) -> Result<Json<Site>, ApiError> {
    require_site(&state, &SiteId::new(site_id)).await.map(Json)
}

/// Resolve a site or fail with 404
pub(crate) async fn require_site(state: &AppState, site_id: &SiteId) -> Result<Site, ApiError> {
    state
        .sites
        .get_site(site_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load site");
            ApiError::internal("Failed to load site").with_details(e.to_string())
        })?
        .ok_or_else(|| ApiError::not_found("Site not found").with_details(site_id.to_string()))
}
