//! Roofline Detect - Automated roof outline acquisition
//!
//! This crate runs the acquisition pipeline for a site: it fetches aerial
//! imagery through an ordered provider chain, tries the configured
//! detectors in priority order, falls back to a deterministic heuristic,
//! validates every candidate, and persists the surviving structure set.

pub mod coordinator;
pub mod detector;
pub mod heuristic;
pub mod imagery;
pub mod models;
pub mod orchestrator;

pub use coordinator::AcquisitionCoordinator;
pub use detector::HttpDetector;
pub use heuristic::HeuristicFallback;
pub use imagery::{HttpImageProvider, ImageryChain};
pub use models::{
    AcquisitionFailure, AcquisitionRequest, AcquisitionResponse, AcquisitionSuccess, AttemptStatus,
    DetectorAttempt, FailureStep, OutlineFeature, SegmentationOutcome,
};
pub use orchestrator::{FallbackGenerator, SegmentationOrchestrator};
