//! Plausibility checks for detected roof polygons.
//!
//! Rejections are verdicts, not errors: the acquisition pipeline drops a
//! rejected candidate and carries on with the rest.

use roofline_core::models::{GeoPoint, RoofPolygon};
use serde::{Deserialize, Serialize};

use crate::geodesic::{centroid, distance_meters};

/// Validation result with the first failing rule, if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, reason: None }
    }

    /// Create an invalid result
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self { is_valid: false, reason: Some(reason.into()) }
    }
}

/// Shape and plausibility limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Closed triangle minimum: three vertices plus the closing point
    pub min_ring_points: usize,
    /// Smaller areas are slivers (antenna shadows, noise)
    pub min_area_sq_ft: f64,
    /// Larger areas are parcel-scale false positives
    pub max_area_sq_ft: f64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self { min_ring_points: 4, min_area_sq_ft: 120.0, max_area_sq_ft: 50_000.0 }
    }
}

/// Accepts or rejects candidate polygons; rules short-circuit in order
#[derive(Debug, Clone, Default)]
pub struct PolygonValidator {
    rules: ValidationRules,
}

impl PolygonValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn validate(&self, polygon: &RoofPolygon) -> ValidationResult {
        if polygon.ring.len() < self.rules.min_ring_points {
            return ValidationResult::invalid(format!(
                "ring has {} points, at least {} required",
                polygon.ring.len(),
                self.rules.min_ring_points
            ));
        }

        let area = polygon.area_sq_ft;
        if !(self.rules.min_area_sq_ft..=self.rules.max_area_sq_ft).contains(&area) {
            return ValidationResult::invalid(format!(
                "area {:.1} sq ft outside [{}, {}]",
                area, self.rules.min_area_sq_ft, self.rules.max_area_sq_ft
            ));
        }

        ValidationResult::valid()
    }
}

/// Outcome of comparing a candidate's centroid with the expected site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum DriftVerdict {
    Accepted { drift_m: f64 },
    /// Accepted, but far enough off to be worth a warning
    Warned { drift_m: f64 },
    Rejected { drift_m: f64 },
}

impl DriftVerdict {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, DriftVerdict::Rejected { .. })
    }

    pub fn drift_m(&self) -> f64 {
        match *self {
            DriftVerdict::Accepted { drift_m }
            | DriftVerdict::Warned { drift_m }
            | DriftVerdict::Rejected { drift_m } => drift_m,
        }
    }
}

/// Guards against background objects (neighboring roofs, parking
/// structures) that pass the area rules but sit in the wrong place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftCheck {
    pub accept_within_m: f64,
    pub warn_within_m: f64,
}

impl Default for DriftCheck {
    fn default() -> Self {
        Self { accept_within_m: 20.0, warn_within_m: 100.0 }
    }
}

impl DriftCheck {
    pub fn check(&self, polygon: &RoofPolygon, expected: &GeoPoint) -> DriftVerdict {
        let drift_m = distance_meters(&centroid(&polygon.ring), expected);

        if drift_m <= self.accept_within_m {
            DriftVerdict::Accepted { drift_m }
        } else if drift_m <= self.warn_within_m {
            DriftVerdict::Warned { drift_m }
        } else {
            DriftVerdict::Rejected { drift_m }
        }
    }
}
