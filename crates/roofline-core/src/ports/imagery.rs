use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AerialImage, BoundingBox};

/// Port for fetching aerial imagery covering a bounding box
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Name recorded on fetched images
    fn name(&self) -> &str;

    /// Whether the provider has what it needs to make requests
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch an image whose extent is exactly `bbox`
    async fn fetch(&self, bbox: &BoundingBox) -> Result<AerialImage>;
}
