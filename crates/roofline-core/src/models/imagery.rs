use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::BoundingBox;
use super::site::SiteId;

/// Reference to an archived aerial image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    /// Fresh, globally unique reference
    pub fn generate(site_id: &SiteId) -> Self {
        Self(format!("{}/{}", site_id, uuid::Uuid::new_v4()))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw image returned by an imagery provider, covering `bbox` exactly
#[derive(Debug, Clone, PartialEq)]
pub struct AerialImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// Name of the provider that served the image
    pub provider: String,
    pub bbox: BoundingBox,
    pub width: u32,
    pub height: u32,
}

/// Archive metadata kept for traceability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub image_ref: ImageRef,
    pub site_id: SiteId,
    pub provider: String,
    pub bbox: BoundingBox,
    pub width: u32,
    pub height: u32,
    pub content_type: String,
    pub byte_len: usize,
    pub fetched_at: DateTime<Utc>,
}

impl ImageRecord {
    pub fn describe(image_ref: ImageRef, site_id: SiteId, image: &AerialImage) -> Self {
        Self {
            image_ref,
            site_id,
            provider: image.provider.clone(),
            bbox: image.bbox,
            width: image.width,
            height: image.height,
            content_type: image.content_type.clone(),
            byte_len: image.bytes.len(),
            fetched_at: Utc::now(),
        }
    }
}
