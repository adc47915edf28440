//! Bounding boxes around a site and the pixel ↔ geodesic georeference.

use roofline_core::models::{BoundingBox, GeoPoint, PixelPoint, PrecisionTier};
use serde::{Deserialize, Serialize};

/// Search area around a site coordinate for the given precision tier
pub fn bounding_box(center: GeoPoint, precision: PrecisionTier) -> BoundingBox {
    BoundingBox::around(center, precision.margin_degrees())
}

/// Maps an image that covers `bbox` exactly (north-up, linear in degrees)
/// onto geodesic coordinates.
///
/// This is the only place pixel and geodesic coordinates meet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Georeference {
    pub bbox: BoundingBox,
    pub width: u32,
    pub height: u32,
}

impl Georeference {
    pub fn new(bbox: BoundingBox, width: u32, height: u32) -> Self {
        Self { bbox, width: width.max(1), height: height.max(1) }
    }

    pub fn pixel_to_geo(&self, point: &PixelPoint) -> GeoPoint {
        let fx = point.x / f64::from(self.width);
        let fy = point.y / f64::from(self.height);
        GeoPoint::new(
            self.bbox.west + fx * self.bbox.width_degrees(),
            self.bbox.north - fy * self.bbox.height_degrees(),
        )
    }

    pub fn geo_to_pixel(&self, point: &GeoPoint) -> PixelPoint {
        let fx = (point.lng - self.bbox.west) / self.bbox.width_degrees();
        let fy = (self.bbox.north - point.lat) / self.bbox.height_degrees();
        PixelPoint::new(fx * f64::from(self.width), fy * f64::from(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_controls_box_size() {
        let center = GeoPoint::new(-97.0, 32.0);
        let high = bounding_box(center, PrecisionTier::High);
        let standard = bounding_box(center, PrecisionTier::Standard);

        assert!(high.width_degrees() < standard.width_degrees());
        assert!((high.center().lng - center.lng).abs() < 1e-12);
        // ≈33 m north of center for the high tier
        let north_m = (high.north - center.lat) * crate::geodesic::METERS_PER_DEGREE_LAT;
        assert!((north_m - 33.4).abs() < 0.1);
    }

    #[test]
    fn test_corners_map_to_bbox_corners() {
        let bbox = BoundingBox::new(-97.001, 31.999, -96.999, 32.001);
        let georef = Georeference::new(bbox, 1000, 500);

        let top_left = georef.pixel_to_geo(&PixelPoint::new(0.0, 0.0));
        assert!((top_left.lng - bbox.west).abs() < 1e-12);
        assert!((top_left.lat - bbox.north).abs() < 1e-12);

        let bottom_right = georef.pixel_to_geo(&PixelPoint::new(1000.0, 500.0));
        assert!((bottom_right.lng - bbox.east).abs() < 1e-12);
        assert!((bottom_right.lat - bbox.south).abs() < 1e-12);
    }

    #[test]
    fn test_pixel_geo_inverse() {
        let georef = Georeference::new(BoundingBox::new(10.0, 50.0, 10.01, 50.01), 640, 640);
        let pixel = PixelPoint::new(123.5, 456.25);
        let back = georef.geo_to_pixel(&georef.pixel_to_geo(&pixel));
        assert!((back.x - pixel.x).abs() < 1e-6);
        assert!((back.y - pixel.y).abs() < 1e-6);
    }
}
