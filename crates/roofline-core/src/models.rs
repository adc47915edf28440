pub mod edge;
pub mod geometry;
pub mod imagery;
pub mod polygon;
pub mod records;
pub mod site;

pub use edge::{Edge, EdgeId, EdgeType, Endpoint, PixelScale};
pub use geometry::{AlignmentTransform, BoundingBox, GeoPoint, PixelPoint, PrecisionTier};
pub use imagery::{AerialImage, ImageRecord, ImageRef};
pub use polygon::{CandidatePolygon, RoofPolygon, StructureId};
pub use records::{DetectionMethod, DrawingRecord, SiteAggregate, StructureRecord, StructureSummary};
pub use site::{Site, SiteId};
