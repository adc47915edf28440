//! Hand-drawn roof edges in pixel space.
//!
//! Edges are value records: every edit builds a new [`Edge`] rather than
//! patching fields, which keeps editor history snapshots independent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::geometry::PixelPoint;
use crate::error::{Result, RooflineError};

/// Roof-construction role of a drawn edge
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeType {
    #[default]
    Unlabeled,
    Eave,
    Rake,
    Ridge,
    Hip,
    Valley,
    Step,
    Wall,
    PitchChange,
}

impl EdgeType {
    pub const ALL: [EdgeType; 9] = [
        EdgeType::Unlabeled,
        EdgeType::Eave,
        EdgeType::Rake,
        EdgeType::Ridge,
        EdgeType::Hip,
        EdgeType::Valley,
        EdgeType::Step,
        EdgeType::Wall,
        EdgeType::PitchChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Unlabeled => "unlabeled",
            EdgeType::Eave => "eave",
            EdgeType::Rake => "rake",
            EdgeType::Ridge => "ridge",
            EdgeType::Hip => "hip",
            EdgeType::Valley => "valley",
            EdgeType::Step => "step",
            EdgeType::Wall => "wall",
            EdgeType::PitchChange => "pitch-change",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = RooflineError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        EdgeType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| RooflineError::ConfigInvalid {
                key: "edge_type".to_string(),
                reason: format!("Unknown edge type: {}", s),
            })
    }
}

/// Identifier of an edge within one drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

/// Which end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

/// Pixel-to-feet conversion for a piece of imagery
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelScale {
    pub pixels_per_foot: f64,
}

impl PixelScale {
    /// Used when the imagery carries no calibrated scale
    pub const DEFAULT_PIXELS_PER_FOOT: f64 = 10.0;

    /// Non-positive or non-finite scales fall back to the default
    pub fn new(pixels_per_foot: f64) -> Self {
        if pixels_per_foot.is_finite() && pixels_per_foot > 0.0 {
            Self { pixels_per_foot }
        } else {
            Self::default()
        }
    }

    pub fn length_ft(&self, a: &PixelPoint, b: &PixelPoint) -> f64 {
        a.distance_to(b) / self.pixels_per_foot
    }
}

impl Default for PixelScale {
    fn default() -> Self {
        Self { pixels_per_foot: Self::DEFAULT_PIXELS_PER_FOOT }
    }
}

/// A committed line segment. `length` is derived from the endpoints and the
/// scale in effect when the record was built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    #[serde(rename = "startPoint")]
    pub start: PixelPoint,
    #[serde(rename = "endPoint")]
    pub end: PixelPoint,
    #[serde(rename = "length")]
    pub length_ft: f64,
    #[serde(default)]
    pub edge_type: EdgeType,
}

impl Edge {
    pub fn new(id: EdgeId, start: PixelPoint, end: PixelPoint, scale: PixelScale) -> Self {
        Self {
            id,
            start,
            end,
            length_ft: scale.length_ft(&start, &end),
            edge_type: EdgeType::Unlabeled,
        }
    }

    pub fn with_edge_type(&self, edge_type: EdgeType) -> Self {
        Self { edge_type, ..*self }
    }

    /// Copy with one endpoint moved and the length recomputed
    pub fn with_endpoint(&self, which: Endpoint, point: PixelPoint, scale: PixelScale) -> Self {
        let (start, end) = match which {
            Endpoint::Start => (point, self.end),
            Endpoint::End => (self.start, point),
        };
        Self {
            start,
            end,
            length_ft: scale.length_ft(&start, &end),
            ..*self
        }
    }

    /// Copy with the length recomputed under a different scale
    pub fn rescaled(&self, scale: PixelScale) -> Self {
        Self { length_ft: scale.length_ft(&self.start, &self.end), ..*self }
    }

    pub fn endpoint(&self, which: Endpoint) -> PixelPoint {
        match which {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    pub fn length_px(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Direction from start to end in degrees, [0, 360)
    pub fn angle_degrees(&self) -> f64 {
        self.start.angle_to(&self.end)
    }
}
