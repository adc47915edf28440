use roofline_core::models::{DrawingRecord, Edge, EdgeType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Total edge length in feet per edge type, for material estimates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeTotals {
    pub by_type: BTreeMap<EdgeType, f64>,
    pub total_ft: f64,
}

impl EdgeTotals {
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut totals = Self::default();
        for edge in edges {
            *totals.by_type.entry(edge.edge_type).or_insert(0.0) += edge.length_ft;
            totals.total_ft += edge.length_ft;
        }
        totals
    }

    pub fn from_drawing(drawing: &DrawingRecord) -> Self {
        Self::from_edges(&drawing.edges)
    }

    pub fn feet(&self, edge_type: EdgeType) -> f64 {
        self.by_type.get(&edge_type).copied().unwrap_or(0.0)
    }

    /// Length still waiting for an edge type
    pub fn unlabeled_ft(&self) -> f64 {
        self.feet(EdgeType::Unlabeled)
    }
}
