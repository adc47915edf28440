//! Ordered fallback chain over segmentation detectors.
//!
//! Detectors are tried one at a time in configured order. A later detector
//! only runs after every earlier one failed or produced nothing above the
//! confidence threshold. When the chain is exhausted the heuristic
//! generator runs; if that also yields nothing the outcome is
//! `manual_needed`. No branch returns an error.

use roofline_core::models::{AerialImage, BoundingBox, CandidatePolygon, DetectionMethod};
use roofline_core::ports::Detector;
use std::sync::Arc;

use crate::models::{AttemptStatus, DetectorAttempt, SegmentationOutcome};

/// Default confidence below which candidates are discarded
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

/// Offline candidate generator used when every detector came up empty
pub trait FallbackGenerator: Send + Sync {
    fn name(&self) -> &str;

    fn generate(&self, bbox: &BoundingBox) -> Vec<CandidatePolygon>;
}

pub struct SegmentationOrchestrator {
    detectors: Vec<Arc<dyn Detector>>,
    fallback: Option<Arc<dyn FallbackGenerator>>,
    min_confidence: f64,
}

impl SegmentationOrchestrator {
    pub fn new(
        detectors: Vec<Arc<dyn Detector>>,
        fallback: Option<Arc<dyn FallbackGenerator>>,
    ) -> Self {
        Self { detectors, fallback, min_confidence: DEFAULT_MIN_CONFIDENCE }
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run the chain over one image
    pub async fn run(&self, image: &AerialImage) -> SegmentationOutcome {
        let mut attempts = Vec::with_capacity(self.detectors.len());

        for detector in &self.detectors {
            let candidates = match detector.infer(image).await {
                Ok(candidates) => candidates,
                Err(err) => {
                    tracing::warn!(
                        detector = detector.name(),
                        model_missing = err.is_model_missing(),
                        error = %err,
                        "Detector failed, trying next"
                    );
                    attempts.push(DetectorAttempt {
                        detector: detector.name().to_string(),
                        status: AttemptStatus::Failed { reason: err.to_string() },
                    });
                    continue;
                }
            };

            let total = candidates.len();
            let confident: Vec<CandidatePolygon> = candidates
                .into_iter()
                .filter(|c| c.confidence >= self.min_confidence)
                .collect();
            let discarded = total - confident.len();

            if confident.is_empty() {
                tracing::debug!(
                    detector = detector.name(),
                    discarded,
                    "No candidates above confidence threshold"
                );
                attempts.push(DetectorAttempt {
                    detector: detector.name().to_string(),
                    status: AttemptStatus::LowConfidence { discarded },
                });
                continue;
            }

            tracing::info!(
                detector = detector.name(),
                kept = confident.len(),
                discarded,
                "Detector produced confident candidates"
            );
            attempts.push(DetectorAttempt {
                detector: detector.name().to_string(),
                status: AttemptStatus::Accepted { kept: confident.len(), discarded },
            });

            return SegmentationOutcome {
                method: DetectionMethod::AiSegmentation,
                candidates: confident,
                attempts,
            };
        }

        let Some(fallback) = &self.fallback else {
            return SegmentationOutcome::manual_needed(attempts);
        };

        let candidates = fallback.generate(&image.bbox);
        if candidates.is_empty() {
            tracing::info!(generator = fallback.name(), "Fallback produced no candidates");
            return SegmentationOutcome::manual_needed(attempts);
        }

        tracing::info!(
            generator = fallback.name(),
            candidates = candidates.len(),
            "Using heuristic fallback"
        );
        SegmentationOutcome { method: DetectionMethod::HeuristicFallback, candidates, attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use roofline_core::error::{Result, RooflineError};
    use roofline_core::models::GeoPoint;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubDetector {
        name: &'static str,
        response: std::result::Result<Vec<f64>, Option<u16>>,
        calls: AtomicUsize,
    }

    impl StubDetector {
        fn ok(name: &'static str, confidences: Vec<f64>) -> Arc<Self> {
            Arc::new(Self { name, response: Ok(confidences), calls: AtomicUsize::new(0) })
        }

        fn failing(name: &'static str, status: Option<u16>) -> Arc<Self> {
            Arc::new(Self { name, response: Err(status), calls: AtomicUsize::new(0) })
        }
    }

    fn candidate(confidence: f64, source: &str) -> CandidatePolygon {
        CandidatePolygon::new(
            vec![
                GeoPoint::new(-97.0, 32.0),
                GeoPoint::new(-96.9999, 32.0),
                GeoPoint::new(-96.9999, 32.0001),
            ],
            confidence,
            source,
        )
    }

    #[async_trait]
    impl Detector for StubDetector {
        fn name(&self) -> &str {
            self.name
        }

        async fn infer(&self, _image: &AerialImage) -> Result<Vec<CandidatePolygon>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(confidences) => Ok(confidences.iter().map(|c| candidate(*c, self.name)).collect()),
                Err(status) => Err(RooflineError::DetectorFailed {
                    detector: self.name.to_string(),
                    status: *status,
                    reason: "unavailable".to_string(),
                }),
            }
        }
    }

    struct StubFallback(usize);

    impl FallbackGenerator for StubFallback {
        fn name(&self) -> &str {
            "stub-fallback"
        }

        fn generate(&self, _bbox: &BoundingBox) -> Vec<CandidatePolygon> {
            (0..self.0).map(|_| candidate(0.75, "stub-fallback")).collect()
        }
    }

    fn image() -> AerialImage {
        AerialImage {
            bytes: vec![1, 2, 3],
            content_type: "image/png".to_string(),
            provider: "test".to_string(),
            bbox: BoundingBox::new(-97.0005, 31.9995, -96.9995, 32.0005),
            width: 512,
            height: 512,
        }
    }

    #[tokio::test]
    async fn test_first_confident_detector_wins() {
        let first = StubDetector::ok("first", vec![0.9, 0.5]);
        let second = StubDetector::ok("second", vec![0.95]);
        let orchestrator =
            SegmentationOrchestrator::new(vec![first.clone() as Arc<dyn Detector>, second.clone()], None);

        let outcome = orchestrator.run(&image()).await;

        assert_eq!(outcome.method, DetectionMethod::AiSegmentation);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].source, "first");
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            outcome.attempts[0].status,
            AttemptStatus::Accepted { kept: 1, discarded: 1 }
        );
    }

    #[tokio::test]
    async fn test_model_missing_is_skipped_like_any_failure() {
        let missing = StubDetector::failing("missing", Some(404));
        let broken = StubDetector::failing("broken", None);
        let good = StubDetector::ok("good", vec![0.8]);
        let orchestrator =
            SegmentationOrchestrator::new(vec![missing as Arc<dyn Detector>, broken, good.clone()], None);

        let outcome = orchestrator.run(&image()).await;

        assert_eq!(outcome.method, DetectionMethod::AiSegmentation);
        assert_eq!(good.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.attempts.len(), 3);
        assert!(matches!(outcome.attempts[0].status, AttemptStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_low_confidence_falls_through_to_fallback() {
        let weak = StubDetector::ok("weak", vec![0.69, 0.2]);
        let orchestrator =
            SegmentationOrchestrator::new(vec![weak as Arc<dyn Detector>], Some(Arc::new(StubFallback(1))));

        let outcome = orchestrator.run(&image()).await;

        assert_eq!(outcome.method, DetectionMethod::HeuristicFallback);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.attempts[0].status, AttemptStatus::LowConfidence { discarded: 2 });
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let edge = StubDetector::ok("edge", vec![0.7]);
        let outcome = SegmentationOrchestrator::new(vec![edge as Arc<dyn Detector>], None).run(&image()).await;
        assert_eq!(outcome.method, DetectionMethod::AiSegmentation);
    }

    #[tokio::test]
    async fn test_empty_fallback_is_manual_needed() {
        let failing = StubDetector::failing("down", Some(503));
        let orchestrator =
            SegmentationOrchestrator::new(vec![failing as Arc<dyn Detector>], Some(Arc::new(StubFallback(0))));

        let outcome = orchestrator.run(&image()).await;

        assert_eq!(outcome.method, DetectionMethod::ManualNeeded);
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_no_detectors_no_fallback() {
        let outcome = SegmentationOrchestrator::new(Vec::new(), None).run(&image()).await;
        assert_eq!(outcome, SegmentationOutcome::manual_needed(Vec::new()));
    }
}
