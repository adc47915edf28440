use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::GeoPoint;

/// Externally visible identifier of a detected roof structure
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(pub String);

impl StructureId {
    /// One-based, per-site structure label (`structure-1`, `structure-2`, ...)
    pub fn numbered(index: usize) -> Self {
        Self(format!("structure-{}", index + 1))
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unmeasured polygon proposed by a detector or the heuristic fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePolygon {
    /// Geodesic ring; may or may not repeat the first vertex at the end
    pub ring: Vec<GeoPoint>,

    /// Score in [0, 1]
    pub confidence: f64,

    /// Name of the detector or generator that produced it
    pub source: String,
}

impl CandidatePolygon {
    pub fn new(ring: Vec<GeoPoint>, confidence: f64, source: impl Into<String>) -> Self {
        Self { ring, confidence: confidence.clamp(0.0, 1.0), source: source.into() }
    }

    /// Copy of the ring with the closing vertex appended when missing
    pub fn closed_ring(&self) -> Vec<GeoPoint> {
        let mut ring = self.ring.clone();
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if ring.len() > 1 && first != last {
                ring.push(first);
            }
        }
        ring
    }
}

/// Measured roof structure candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoofPolygon {
    pub id: StructureId,

    /// Closed ring (first == last)
    pub ring: Vec<GeoPoint>,

    pub area_sq_ft: f64,

    pub perimeter_ft: f64,

    pub confidence: f64,
}

impl RoofPolygon {
    /// Distinct vertices, without the closing duplicate
    pub fn vertices(&self) -> &[GeoPoint] {
        match (self.ring.first(), self.ring.last()) {
            (Some(first), Some(last)) if self.ring.len() > 1 && first == last => {
                &self.ring[..self.ring.len() - 1]
            }
            _ => &self.ring,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_ring_appends_first_vertex() {
        let candidate = CandidatePolygon::new(
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0), GeoPoint::new(1.0, 1.0)],
            0.9,
            "test",
        );
        let ring = candidate.closed_ring();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn test_closed_ring_keeps_closed_input() {
        let candidate = CandidatePolygon::new(
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(1.0, 0.0),
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(0.0, 0.0),
            ],
            1.4,
            "test",
        );
        assert_eq!(candidate.closed_ring().len(), 4);
        assert_eq!(candidate.confidence, 1.0);
    }

    #[test]
    fn test_structure_ids_are_one_based() {
        assert_eq!(StructureId::numbered(0).to_string(), "structure-1");
    }
}
