use roofline_core::error::RooflineError;
use roofline_core::models::{
    DetectionMethod, RoofPolygon, SiteAggregate, SiteId, StructureId, StructureRecord,
};
use roofline_core::ports::ImageProvider;
use roofline_geo::{bounding_box, measure_candidate, DriftCheck, DriftVerdict, PolygonValidator};
use roofline_store::ports::{ImageArchive, SiteStore, StructureStore};
use std::sync::Arc;

use crate::models::{
    AcquisitionFailure, AcquisitionRequest, AcquisitionResponse, AcquisitionSuccess, FailureStep,
    OutlineFeature,
};
use crate::orchestrator::{SegmentationOrchestrator, DEFAULT_MIN_CONFIDENCE};

type StepResult<T> = std::result::Result<T, AcquisitionFailure>;

trait AtStep<T> {
    fn at_step(self, step: FailureStep) -> StepResult<T>;
}

impl<T> AtStep<T> for roofline_core::error::Result<T> {
    fn at_step(self, step: FailureStep) -> StepResult<T> {
        self.or_else(|err| fail(step, err))
    }
}

fn fail<T>(step: FailureStep, err: RooflineError) -> StepResult<T> {
    tracing::warn!(step = %step, error = %err, "Acquisition failed");
    Err(AcquisitionFailure::new(step, &err))
}

/// End-to-end "outline this site's roof" pipeline.
///
/// Every infrastructure failure short-circuits into a step-tagged
/// [`AcquisitionFailure`]; finding no confident boundary is a successful
/// `manual_needed` response and leaves the stored structure set untouched.
pub struct AcquisitionCoordinator {
    imagery: Arc<dyn ImageProvider>,
    orchestrator: SegmentationOrchestrator,
    sites: Arc<dyn SiteStore>,
    archive: Arc<dyn ImageArchive>,
    structures: Arc<dyn StructureStore>,
    validator: PolygonValidator,
    drift: DriftCheck,
    inclusion_threshold: f64,
}

impl AcquisitionCoordinator {
    pub fn new(
        imagery: Arc<dyn ImageProvider>,
        orchestrator: SegmentationOrchestrator,
        sites: Arc<dyn SiteStore>,
        archive: Arc<dyn ImageArchive>,
        structures: Arc<dyn StructureStore>,
    ) -> Self {
        Self {
            imagery,
            orchestrator,
            sites,
            archive,
            structures,
            validator: PolygonValidator::default(),
            drift: DriftCheck::default(),
            inclusion_threshold: DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn with_validator(mut self, validator: PolygonValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_drift_check(mut self, drift: DriftCheck) -> Self {
        self.drift = drift;
        self
    }

    pub fn with_inclusion_threshold(mut self, threshold: f64) -> Self {
        self.inclusion_threshold = threshold;
        self
    }

    pub async fn acquire(&self, request: &AcquisitionRequest) -> AcquisitionResponse {
        match self.run(request).await {
            Ok(success) => AcquisitionResponse::Success(success),
            Err(failure) => AcquisitionResponse::Failure(failure),
        }
    }

    async fn run(&self, request: &AcquisitionRequest) -> StepResult<AcquisitionSuccess> {
        if !self.imagery.is_configured() {
            return fail(
                FailureStep::Config,
                RooflineError::ConfigMissing { key: "imagery provider".to_string() },
            );
        }

        let site_id = request
            .site_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(SiteId::new)
            .ok_or_else(|| RooflineError::MissingField { field: "siteId".to_string() })
            .at_step(FailureStep::InputValidation)?;

        let site = self
            .sites
            .get_site(&site_id)
            .await
            .at_step(FailureStep::Persistence)?
            .ok_or_else(|| RooflineError::SiteNotFound { site_id: site_id.to_string() })
            .at_step(FailureStep::InputValidation)?;

        if !site.location.is_valid() {
            return fail(
                FailureStep::InputValidation,
                RooflineError::InvalidGeometry {
                    reason: format!("site {} has an invalid location", site_id),
                },
            );
        }

        let bbox = bounding_box(site.location, request.precision);
        tracing::debug!(site_id = %site_id, precision = %request.precision, "Resolved bounding box");

        let image = self.imagery.fetch(&bbox).await.at_step(FailureStep::FetchImage)?;
        let image_ref = self
            .archive
            .store_image(&site_id, &image)
            .await
            .at_step(FailureStep::Persistence)?;

        let outcome = self.orchestrator.run(&image).await;
        let mut warnings = Vec::new();
        let mut accepted: Vec<RoofPolygon> = Vec::new();

        for candidate in &outcome.candidates {
            let polygon = match measure_candidate(StructureId::numbered(accepted.len()), candidate) {
                Ok(polygon) => polygon,
                Err(err) => {
                    tracing::debug!(source = %candidate.source, error = %err, "Dropping unmeasurable candidate");
                    continue;
                }
            };

            let validation = self.validator.validate(&polygon);
            if !validation.is_valid {
                tracing::debug!(
                    source = %candidate.source,
                    reason = validation.reason.as_deref().unwrap_or_default(),
                    "Candidate rejected"
                );
                continue;
            }

            match self.drift.check(&polygon, &site.location) {
                DriftVerdict::Accepted { .. } => {}
                DriftVerdict::Warned { drift_m } => {
                    tracing::warn!(site_id = %site_id, structure = %polygon.id, drift_m, "Candidate drifted from site");
                    warnings.push(format!(
                        "{} centroid is {:.0} m from the site coordinate",
                        polygon.id, drift_m
                    ));
                }
                DriftVerdict::Rejected { drift_m } => {
                    tracing::debug!(source = %candidate.source, drift_m, "Candidate rejected by drift check");
                    continue;
                }
            }

            accepted.push(polygon);
        }

        let rejected = outcome.candidates.len() - accepted.len();
        if rejected > 0 {
            warnings.push(format!("{} candidate(s) rejected by validation", rejected));
        }

        if accepted.is_empty() {
            tracing::info!(site_id = %site_id, attempts = outcome.attempts.len(), "Manual outline needed");
            return Ok(AcquisitionSuccess {
                success: true,
                method: DetectionMethod::ManualNeeded,
                image_ref,
                bounding_box: bbox,
                features: Vec::new(),
                warnings,
            });
        }

        if outcome.method == DetectionMethod::HeuristicFallback {
            warnings.push(
                "Outline estimated by heuristic fallback; verify before use".to_string(),
            );
        }

        let records: Vec<StructureRecord> = accepted
            .iter()
            .map(|p| StructureRecord::from_polygon(site_id.clone(), p, self.inclusion_threshold))
            .collect();
        let aggregate = SiteAggregate::summarize(site_id.clone(), &records, outcome.method);

        self.structures
            .replace_structures(&site_id, &records, &aggregate)
            .await
            .at_step(FailureStep::Persistence)?;

        tracing::info!(
            site_id = %site_id,
            method = %outcome.method,
            structures = records.len(),
            total_area_sq_ft = aggregate.total_area_sq_ft,
            "Stored roof outline"
        );

        Ok(AcquisitionSuccess {
            success: true,
            method: outcome.method,
            image_ref,
            bounding_box: bbox,
            features: records.iter().map(OutlineFeature::from).collect(),
            warnings,
        })
    }
}
