use roofline_core::models::{AlignmentTransform, Edge, EdgeId, EdgeType, PixelPoint, PixelScale};
use serde::Deserialize;

/// Request to create or replace a site
#[derive(Debug, Deserialize)]
pub struct RegisterSiteRequest {
    pub name: String,
    pub lng: f64,
    pub lat: f64,
    #[serde(default)]
    pub address: Option<String>,
}

/// One drawn line as submitted by the editor. Lengths are recomputed
/// server-side from the endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingEdge {
    pub id: u64,
    pub start_point: PixelPoint,
    pub end_point: PixelPoint,
    #[serde(default)]
    pub edge_type: EdgeType,
}

impl DrawingEdge {
    pub fn to_edge(&self, scale: PixelScale) -> Edge {
        Edge::new(EdgeId(self.id), self.start_point, self.end_point, scale).with_edge_type(self.edge_type)
    }
}

/// Request to save the operator's finalized drawing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDrawingRequest {
    pub edges: Vec<DrawingEdge>,
    #[serde(default)]
    pub alignment: AlignmentTransform,
    #[serde(default)]
    pub pixels_per_foot: Option<f64>,
}
