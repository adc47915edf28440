use roofline_core::config::LayeredConfig;
use roofline_core::error::Result;
use roofline_core::models::PixelScale;
use roofline_core::ports::{Detector, ImageProvider};
use roofline_detect::{
    AcquisitionCoordinator, HeuristicFallback, HttpDetector, ImageryChain, SegmentationOrchestrator,
};
use roofline_store::{
    DrawingStore, MemoryDrawingStore, MemoryImageArchive, MemorySiteStore, MemoryStructureStore,
    SiteStore, StructureStore,
};
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
pub struct AppState {
    pub sites: Arc<dyn SiteStore>,
    pub structures: Arc<dyn StructureStore>,
    pub drawings: Arc<dyn DrawingStore>,
    pub coordinator: Arc<AcquisitionCoordinator>,
    /// Scale applied to drawings saved without one
    pub default_scale: PixelScale,
}

impl AppState {
    pub fn new(
        sites: Arc<dyn SiteStore>,
        structures: Arc<dyn StructureStore>,
        drawings: Arc<dyn DrawingStore>,
        coordinator: Arc<AcquisitionCoordinator>,
    ) -> Self {
        Self {
            sites,
            structures,
            drawings,
            coordinator,
            default_scale: PixelScale::default(),
        }
    }

    pub fn with_default_scale(mut self, scale: PixelScale) -> Self {
        self.default_scale = scale;
        self
    }

    /// Wire the pipeline from a validated configuration over in-memory stores
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.value);

        let imagery: Arc<dyn ImageProvider> = Arc::new(ImageryChain::from_config(config)?);

        let detectors: Vec<Arc<dyn Detector>> = config
            .detectors
            .value
            .iter()
            .map(|endpoint| {
                Arc::new(HttpDetector::from_endpoint(
                    endpoint,
                    config.detector_api_key.value.clone(),
                    timeout,
                )) as Arc<dyn Detector>
            })
            .collect();

        let orchestrator = SegmentationOrchestrator::new(detectors, Some(Arc::new(HeuristicFallback::new())))
            .with_min_confidence(config.min_confidence.value);

        tracing::info!(
            detectors = ?orchestrator.detector_names(),
            min_confidence = config.min_confidence.value,
            "Segmentation pipeline configured"
        );

        let sites = Arc::new(MemorySiteStore::new());
        let structures = Arc::new(MemoryStructureStore::new());

        let coordinator = AcquisitionCoordinator::new(
            imagery,
            orchestrator,
            sites.clone(),
            Arc::new(MemoryImageArchive::new()),
            structures.clone(),
        );

        Ok(Self::new(sites, structures, Arc::new(MemoryDrawingStore::new()), Arc::new(coordinator))
            .with_default_scale(PixelScale::new(config.pixels_per_foot.value)))
    }
}
