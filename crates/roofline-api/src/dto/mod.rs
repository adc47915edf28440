pub mod request;
pub mod response;

pub use request::{DrawingEdge, RegisterSiteRequest, SaveDrawingRequest};
pub use response::{DrawingResponse, HealthResponse};
