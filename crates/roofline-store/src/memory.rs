//! In-memory storage implementations for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state.

use async_trait::async_trait;
use roofline_core::error::Result;
use roofline_core::models::{
    AerialImage, DrawingRecord, ImageRecord, ImageRef, Site, SiteAggregate, SiteId,
    StructureRecord,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::{DrawingStore, ImageArchive, SiteStore, StructureStore};

/// In-memory implementation of SiteStore
#[derive(Debug, Clone, Default)]
pub struct MemorySiteStore {
    sites: Arc<RwLock<HashMap<SiteId, Site>>>,
}

impl MemorySiteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with the given sites
    pub fn with_sites(sites: impl IntoIterator<Item = Site>) -> Self {
        let store = Self::new();
        {
            let mut map = store.sites.write().unwrap();
            for site in sites {
                map.insert(site.id.clone(), site);
            }
        }
        store
    }
}

#[async_trait]
impl SiteStore for MemorySiteStore {
    async fn get_site(&self, id: &SiteId) -> Result<Option<Site>> {
        Ok(self.sites.read().unwrap().get(id).cloned())
    }

    async fn put_site(&self, site: &Site) -> Result<()> {
        self.sites.write().unwrap().insert(site.id.clone(), site.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct ArchivedImage {
    record: ImageRecord,
    bytes: Vec<u8>,
}

/// In-memory implementation of ImageArchive
#[derive(Debug, Clone, Default)]
pub struct MemoryImageArchive {
    images: Arc<RwLock<HashMap<ImageRef, ArchivedImage>>>,
}

impl MemoryImageArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of archived images
    pub fn len(&self) -> usize {
        self.images.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes of an archived image
    pub fn image_bytes(&self, image_ref: &ImageRef) -> Option<Vec<u8>> {
        self.images.read().unwrap().get(image_ref).map(|a| a.bytes.clone())
    }
}

#[async_trait]
impl ImageArchive for MemoryImageArchive {
    async fn store_image(&self, site_id: &SiteId, image: &AerialImage) -> Result<ImageRef> {
        let image_ref = ImageRef::generate(site_id);
        let record = ImageRecord::describe(image_ref.clone(), site_id.clone(), image);

        tracing::debug!(image_ref = %image_ref, bytes = record.byte_len, "Archived image");

        self.images
            .write()
            .unwrap()
            .insert(image_ref.clone(), ArchivedImage { record, bytes: image.bytes.clone() });
        Ok(image_ref)
    }

    async fn get_image(&self, image_ref: &ImageRef) -> Result<Option<ImageRecord>> {
        Ok(self.images.read().unwrap().get(image_ref).map(|a| a.record.clone()))
    }
}

#[derive(Debug, Clone)]
struct SiteStructures {
    records: Vec<StructureRecord>,
    aggregate: SiteAggregate,
}

/// In-memory implementation of StructureStore.
/// Records and aggregate live under one lock so a replacement is atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStructureStore {
    sites: Arc<RwLock<HashMap<SiteId, SiteStructures>>>,
}

impl MemoryStructureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StructureStore for MemoryStructureStore {
    async fn replace_structures(
        &self,
        site_id: &SiteId,
        records: &[StructureRecord],
        aggregate: &SiteAggregate,
    ) -> Result<()> {
        let entry = SiteStructures { records: records.to_vec(), aggregate: aggregate.clone() };
        self.sites.write().unwrap().insert(site_id.clone(), entry);
        Ok(())
    }

    async fn list_structures(&self, site_id: &SiteId) -> Result<Vec<StructureRecord>> {
        Ok(self
            .sites
            .read()
            .unwrap()
            .get(site_id)
            .map(|s| s.records.clone())
            .unwrap_or_default())
    }

    async fn get_aggregate(&self, site_id: &SiteId) -> Result<Option<SiteAggregate>> {
        Ok(self.sites.read().unwrap().get(site_id).map(|s| s.aggregate.clone()))
    }
}

/// In-memory implementation of DrawingStore; one drawing per site
#[derive(Debug, Clone, Default)]
pub struct MemoryDrawingStore {
    drawings: Arc<RwLock<HashMap<SiteId, DrawingRecord>>>,
}

impl MemoryDrawingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrawingStore for MemoryDrawingStore {
    async fn save_drawing(&self, drawing: &DrawingRecord) -> Result<()> {
        self.drawings.write().unwrap().insert(drawing.site_id.clone(), drawing.clone());
        Ok(())
    }

    async fn get_drawing(&self, site_id: &SiteId) -> Result<Option<DrawingRecord>> {
        Ok(self.drawings.read().unwrap().get(site_id).cloned())
    }
}
