use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AerialImage, CandidatePolygon};

/// Port for an automated roof boundary detector (typically a remote ML
/// inference service).
///
/// Implementations may fail for any reason (network, missing model, bad
/// response); callers treat every failure as "try the next detector".
#[async_trait]
pub trait Detector: Send + Sync {
    /// Name used in logs and attempt reports
    fn name(&self) -> &str;

    /// Run inference on the raw image bytes
    ///
    /// # Returns
    /// Zero or more candidate polygons in geodesic coordinates, each with its
    /// own confidence
    async fn infer(&self, image: &AerialImage) -> Result<Vec<CandidatePolygon>>;
}
