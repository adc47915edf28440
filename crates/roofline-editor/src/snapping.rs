//! Angle snapping for hand-drawn segments.
//!
//! A drag snaps to the nearest of the four cardinal directions or, when a
//! prior line exists, the two directions perpendicular to it. If nothing is
//! within tolerance a second, cardinal-only pass compares the drag against
//! horizontal and vertical separately. Snapping never changes drag length.

use roofline_core::models::{Edge, PixelPoint};
use serde::{Deserialize, Serialize};

const CARDINALS: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

/// Smallest unsigned difference between two directions in degrees, in [0, 180]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

fn closest(angle: f64, candidates: &[f64]) -> Option<(f64, f64)> {
    candidates
        .iter()
        .map(|&candidate| (candidate, angular_distance(angle, candidate)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapper {
    /// Tolerance for the cardinal + perpendicular-to-prior pass
    pub tolerance_deg: f64,
    /// Tolerance for the cardinal-only fallback pass
    pub cardinal_tolerance_deg: f64,
    /// Shorter drags have no reliable direction and are left alone
    pub min_drag_px: f64,
}

impl Default for Snapper {
    fn default() -> Self {
        Self { tolerance_deg: 15.0, cardinal_tolerance_deg: 15.0, min_drag_px: 5.0 }
    }
}

impl Snapper {
    /// Candidate directions for a drag following `prior`
    pub fn candidate_angles(&self, prior: Option<&Edge>) -> Vec<f64> {
        let mut angles = CARDINALS.to_vec();
        if let Some(prior) = prior.filter(|p| p.length_px() > 0.0) {
            let direction = prior.angle_degrees();
            angles.push((direction + 90.0).rem_euclid(360.0));
            angles.push((direction + 270.0).rem_euclid(360.0));
        }
        angles
    }

    /// Final endpoint for a drag from `start` to `end`
    pub fn snap(
        &self,
        start: PixelPoint,
        end: PixelPoint,
        prior: Option<&Edge>,
        enabled: bool,
    ) -> PixelPoint {
        let length = start.distance_to(&end);
        if !enabled || length < self.min_drag_px {
            return end;
        }

        let angle = start.angle_to(&end);

        if let Some((target, distance)) = closest(angle, &self.candidate_angles(prior)) {
            if distance <= self.tolerance_deg {
                return start.project(target, length);
            }
        }

        // Horizontal and vertical are judged on their own
        for axis in [[0.0, 180.0], [90.0, 270.0]] {
            if let Some((target, distance)) = closest(angle, &axis) {
                if distance <= self.cardinal_tolerance_deg {
                    return start.project(target, length);
                }
            }
        }

        end
    }
}
