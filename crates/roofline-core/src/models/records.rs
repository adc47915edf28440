//! Persisted records: structure sets, per-site aggregates, and editor drawings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::edge::{Edge, PixelScale};
use super::geometry::{AlignmentTransform, GeoPoint};
use super::polygon::{RoofPolygon, StructureId};
use super::site::SiteId;

/// How a structure set was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    AiSegmentation,
    HeuristicFallback,
    ManualNeeded,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::AiSegmentation => "ai_segmentation",
            DetectionMethod::HeuristicFallback => "heuristic_fallback",
            DetectionMethod::ManualNeeded => "manual_needed",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted roof polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureRecord {
    pub site_id: SiteId,
    pub structure_id: StructureId,
    pub ring: Vec<GeoPoint>,
    pub area_sq_ft: f64,
    pub perimeter_ft: f64,
    pub confidence: f64,
    /// Counted toward the site total
    pub included: bool,
}

impl StructureRecord {
    pub fn from_polygon(site_id: SiteId, polygon: &RoofPolygon, inclusion_threshold: f64) -> Self {
        Self {
            site_id,
            structure_id: polygon.id.clone(),
            ring: polygon.ring.clone(),
            area_sq_ft: polygon.area_sq_ft,
            perimeter_ft: polygon.perimeter_ft,
            confidence: polygon.confidence,
            included: polygon.confidence >= inclusion_threshold,
        }
    }
}

/// Per-structure line of a site aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureSummary {
    pub structure_id: StructureId,
    pub area_sq_ft: f64,
    pub perimeter_ft: f64,
    pub confidence: f64,
    pub included: bool,
}

/// Site-level roll-up, replaced together with the structure set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAggregate {
    pub site_id: SiteId,
    /// Sum over included structures only
    pub total_area_sq_ft: f64,
    pub structures: Vec<StructureSummary>,
    pub method: DetectionMethod,
    pub average_confidence: f64,
    pub updated_at: DateTime<Utc>,
}

impl SiteAggregate {
    pub fn summarize(site_id: SiteId, records: &[StructureRecord], method: DetectionMethod) -> Self {
        let total_area_sq_ft = records.iter().filter(|r| r.included).map(|r| r.area_sq_ft).sum();
        let average_confidence = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.confidence).sum::<f64>() / records.len() as f64
        };
        let structures = records
            .iter()
            .map(|r| StructureSummary {
                structure_id: r.structure_id.clone(),
                area_sq_ft: r.area_sq_ft,
                perimeter_ft: r.perimeter_ft,
                confidence: r.confidence,
                included: r.included,
            })
            .collect();

        Self {
            site_id,
            total_area_sq_ft,
            structures,
            method,
            average_confidence,
            updated_at: Utc::now(),
        }
    }
}

/// Operator-finalized drawing. Edge pixel coordinates are only meaningful
/// together with the alignment transform that was active when saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRecord {
    pub site_id: SiteId,
    pub edges: Vec<Edge>,
    pub alignment: AlignmentTransform,
    pub scale: PixelScale,
    pub saved_at: DateTime<Utc>,
}

impl DrawingRecord {
    pub fn total_length_ft(&self) -> f64 {
        self.edges.iter().map(|e| e.length_ft).sum()
    }
}
