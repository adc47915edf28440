//! Geodesic math for roof-sized rings.
//!
//! Area uses a local flat-earth approximation around a reference latitude.
//! It is accurate for rings spanning at most a few tens of meters and must
//! not be used for parcel- or country-scale polygons.

use geo::{Area, Coord, Distance, Haversine, LineString, Point, Polygon};
use roofline_core::error::{Result, RooflineError};
use roofline_core::models::{CandidatePolygon, GeoPoint, RoofPolygon, StructureId};

pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
pub const SQ_FT_PER_SQ_M: f64 = 10.7639;
pub const FEET_PER_METER: f64 = 3.28084;

/// Meters per degree of longitude at `latitude`
pub fn meters_per_degree_lng(latitude: f64) -> f64 {
    METERS_PER_DEGREE_LAT * latitude.to_radians().cos()
}

/// Great-circle (haversine) distance in meters
pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    Haversine.distance(Point::new(a.lng, a.lat), Point::new(b.lng, b.lat))
}

/// Signed planar area of `ring` in square feet.
///
/// The shoelace sum is taken over raw degree coordinates and scaled with the
/// meters-per-degree factors at `reference_latitude`. Counter-clockwise rings
/// (longitude east, latitude north) are positive. Fewer than 3 vertices
/// yields 0.
pub fn polygon_area_sq_ft(ring: &[GeoPoint], reference_latitude: f64) -> f64 {
    if distinct_vertices(ring).len() < 3 {
        return 0.0;
    }

    // Translating to the first vertex leaves the area unchanged and keeps the
    // determinant terms small.
    let origin = ring[0];
    let coords: Vec<Coord> =
        ring.iter().map(|p| Coord { x: p.lng - origin.lng, y: p.lat - origin.lat }).collect();
    let square_degrees = Polygon::new(LineString::from(coords), vec![]).signed_area();

    square_degrees * METERS_PER_DEGREE_LAT * meters_per_degree_lng(reference_latitude) * SQ_FT_PER_SQ_M
}

/// Sum of consecutive great-circle distances around the ring, in feet.
/// An open ring is measured as if closed.
pub fn polygon_perimeter_ft(ring: &[GeoPoint]) -> f64 {
    let vertices = distinct_vertices(ring);
    if vertices.len() < 3 {
        return 0.0;
    }

    let meters: f64 = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(a, b)| distance_meters(a, b))
        .sum();

    meters * FEET_PER_METER
}

/// Arithmetic mean of the distinct vertices (closing duplicate excluded)
pub fn centroid(ring: &[GeoPoint]) -> GeoPoint {
    let vertices = distinct_vertices(ring);
    if vertices.len() < 3 {
        return GeoPoint::new(0.0, 0.0);
    }

    let n = vertices.len() as f64;
    let (lng_sum, lat_sum) =
        vertices.iter().fold((0.0, 0.0), |(lng, lat), p| (lng + p.lng, lat + p.lat));
    GeoPoint::new(lng_sum / n, lat_sum / n)
}

/// Turn a candidate into a measured polygon. Area is reported as an absolute
/// value, measured at the ring's own centroid latitude.
pub fn measure_candidate(id: StructureId, candidate: &CandidatePolygon) -> Result<RoofPolygon> {
    if let Some(bad) = candidate.ring.iter().find(|p| !p.is_valid()) {
        return Err(RooflineError::InvalidGeometry {
            reason: format!("vertex ({}, {}) is not a valid coordinate", bad.lng, bad.lat),
        });
    }

    let ring = candidate.closed_ring();
    let reference_latitude = centroid(&ring).lat;

    Ok(RoofPolygon {
        id,
        area_sq_ft: polygon_area_sq_ft(&ring, reference_latitude).abs(),
        perimeter_ft: polygon_perimeter_ft(&ring),
        confidence: candidate.confidence,
        ring,
    })
}

fn distinct_vertices(ring: &[GeoPoint]) -> &[GeoPoint] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}
