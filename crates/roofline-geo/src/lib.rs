//! Roofline Geo - Geodesic measurement, validation, and georeferencing
//!
//! This crate handles the geodesic side of roof outlines: distances, areas
//! and perimeters of small rings, bounding boxes around a site, conversion
//! between image pixels and coordinates, plausibility checks for detected
//! polygons, and GeoJSON export.

pub mod bbox;
pub mod export;
pub mod geodesic;
pub mod validation;

pub use bbox::{bounding_box, Georeference};
pub use export::{structure_to_feature, structures_to_feature_collection};
pub use geodesic::{centroid, distance_meters, measure_candidate, polygon_area_sq_ft, polygon_perimeter_ft};
pub use validation::{DriftCheck, DriftVerdict, PolygonValidator, ValidationResult, ValidationRules};
