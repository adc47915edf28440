//! Coordinate types shared across roofline crates.
//!
//! Two coordinate spaces coexist and are kept as distinct types:
//! [`GeoPoint`] (longitude/latitude degrees, used by detection and area
//! truth) and [`PixelPoint`] (image/canvas pixels, used for drawing and
//! snapping). Nothing in this module converts between them; see
//! `roofline_geo::bbox::Georeference` for the single conversion point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RooflineError};

/// WGS 84 coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Both coordinates are finite and within WGS 84 bounds
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// Image/canvas-relative coordinate in pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels
    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Direction from `self` to `other` in degrees, normalized to [0, 360)
    pub fn angle_to(&self, other: &PixelPoint) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees().rem_euclid(360.0)
    }

    /// Point at `distance` pixels from `self` along `angle_degrees`
    pub fn project(&self, angle_degrees: f64, distance: f64) -> PixelPoint {
        let radians = angle_degrees.to_radians();
        PixelPoint::new(self.x + distance * radians.cos(), self.y + distance * radians.sin())
    }
}

/// Geographic bounds in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// Square box of `margin_degrees` on each side of `center`
    pub fn around(center: GeoPoint, margin_degrees: f64) -> Self {
        Self {
            west: center.lng - margin_degrees,
            south: center.lat - margin_degrees,
            east: center.lng + margin_degrees,
            north: center.lat + margin_degrees,
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }

    pub fn width_degrees(&self) -> f64 {
        self.east - self.west
    }

    pub fn height_degrees(&self) -> f64 {
        self.north - self.south
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lng >= self.west
            && point.lng <= self.east
            && point.lat >= self.south
            && point.lat <= self.north
    }

    /// `[west, south, east, north]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }
}

/// How much area around the site coordinate is searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionTier {
    /// ≈33 m on each side of the site coordinate
    High,
    /// ≈55 m on each side of the site coordinate
    #[default]
    Standard,
}

impl PrecisionTier {
    /// Bounding-box margin in degrees, applied to both axes
    pub fn margin_degrees(&self) -> f64 {
        match self {
            PrecisionTier::High => 0.0003,
            PrecisionTier::Standard => 0.0005,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrecisionTier::High => "high",
            PrecisionTier::Standard => "standard",
        }
    }
}

impl fmt::Display for PrecisionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrecisionTier {
    type Err = RooflineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "high" => Ok(PrecisionTier::High),
            "standard" => Ok(PrecisionTier::Standard),
            _ => Err(RooflineError::ConfigInvalid {
                key: "precision".to_string(),
                reason: format!("Invalid precision tier: {}. Use high or standard", s),
            }),
        }
    }
}

/// Translation/rotation applied to the base imagery layer only.
///
/// Drawn geometry never passes through this transform; it is stored next to
/// saved edges so their pixel coordinates can be interpreted later.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentTransform {
    pub offset_x: f64,
    pub offset_y: f64,
    pub rotation_degrees: f64,
}

impl AlignmentTransform {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            rotation_degrees: self.rotation_degrees,
        }
    }

    /// Rotation is kept in [-180, 180)
    pub fn rotated(&self, delta_degrees: f64) -> Self {
        let rotation = (self.rotation_degrees + delta_degrees + 180.0).rem_euclid(360.0) - 180.0;
        Self { rotation_degrees: rotation, ..*self }
    }
}
