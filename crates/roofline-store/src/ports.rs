use async_trait::async_trait;
use roofline_core::error::Result;
use roofline_core::models::{
    AerialImage, DrawingRecord, ImageRecord, ImageRef, Site, SiteAggregate, SiteId,
    StructureRecord,
};

/// Port for site lookup
#[async_trait]
pub trait SiteStore: Send + Sync {
    /// Retrieve a site by ID
    async fn get_site(&self, id: &SiteId) -> Result<Option<Site>>;

    /// Create or replace a site
    async fn put_site(&self, site: &Site) -> Result<()>;
}

/// Port for archiving fetched aerial imagery
#[async_trait]
pub trait ImageArchive: Send + Sync {
    /// Store the image bytes and return a fresh reference to them
    async fn store_image(&self, site_id: &SiteId, image: &AerialImage) -> Result<ImageRef>;

    /// Metadata of an archived image
    async fn get_image(&self, image_ref: &ImageRef) -> Result<Option<ImageRecord>>;
}

/// Port for per-site structure sets and their aggregate
#[async_trait]
pub trait StructureStore: Send + Sync {
    /// Replace the site's structure set and aggregate as one unit.
    /// Readers observe either the previous set or the new one, never a mix.
    async fn replace_structures(
        &self,
        site_id: &SiteId,
        records: &[StructureRecord],
        aggregate: &SiteAggregate,
    ) -> Result<()>;

    /// Structures currently stored for a site, in structure order
    async fn list_structures(&self, site_id: &SiteId) -> Result<Vec<StructureRecord>>;

    /// Aggregate currently stored for a site
    async fn get_aggregate(&self, site_id: &SiteId) -> Result<Option<SiteAggregate>>;
}

/// Port for operator-finalized drawings
#[async_trait]
pub trait DrawingStore: Send + Sync {
    async fn save_drawing(&self, drawing: &DrawingRecord) -> Result<()>;

    async fn get_drawing(&self, site_id: &SiteId) -> Result<Option<DrawingRecord>>;
}
