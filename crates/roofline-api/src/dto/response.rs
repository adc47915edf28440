use roofline_core::models::DrawingRecord;
use roofline_editor::EdgeTotals;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            service: "roofline-api".to_string(),
        }
    }
}

/// Saved drawing plus its per-type length totals
#[derive(Debug, Serialize)]
pub struct DrawingResponse {
    pub drawing: DrawingRecord,
    pub totals: EdgeTotals,
}

impl From<DrawingRecord> for DrawingResponse {
    fn from(drawing: DrawingRecord) -> Self {
        let totals = EdgeTotals::from_drawing(&drawing);
        Self { drawing, totals }
    }
}
