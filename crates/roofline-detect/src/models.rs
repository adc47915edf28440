use roofline_core::error::RooflineError;
use roofline_core::models::{
    BoundingBox, CandidatePolygon, DetectionMethod, GeoPoint, ImageRef, PrecisionTier,
    StructureId, StructureRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Request to outline a site's roof
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionRequest {
    /// Optional on the wire so a missing id is reported as an input
    /// validation failure rather than a decoding error
    #[serde(default)]
    pub site_id: Option<String>,

    #[serde(default)]
    pub precision: PrecisionTier,
}

impl AcquisitionRequest {
    pub fn new(site_id: impl Into<String>, precision: PrecisionTier) -> Self {
        Self { site_id: Some(site_id.into()), precision }
    }
}

/// Pipeline stage a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureStep {
    Config,
    InputValidation,
    FetchImage,
    Inference,
    PolygonValidation,
    DriftCheck,
    Persistence,
}

impl FailureStep {
    /// Canonical stage for an error raised outside a specific stage
    pub fn for_error(err: &RooflineError) -> Self {
        match err {
            RooflineError::ConfigMissing { .. } | RooflineError::ConfigInvalid { .. } => {
                FailureStep::Config
            }
            RooflineError::MissingField { .. } | RooflineError::SiteNotFound { .. } => {
                FailureStep::InputValidation
            }
            RooflineError::ImageryUnavailable { .. } => FailureStep::FetchImage,
            RooflineError::DetectorFailed { .. } => FailureStep::Inference,
            RooflineError::InvalidGeometry { .. } => FailureStep::PolygonValidation,
            RooflineError::Storage(_) | RooflineError::Io(_) | RooflineError::Serialization(_) => {
                FailureStep::Persistence
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStep::Config => "config",
            FailureStep::InputValidation => "input-validation",
            FailureStep::FetchImage => "fetch-image",
            FailureStep::Inference => "inference",
            FailureStep::PolygonValidation => "polygon-validation",
            FailureStep::DriftCheck => "drift-check",
            FailureStep::Persistence => "persistence",
        }
    }
}

impl fmt::Display for FailureStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structure in a success response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineFeature {
    pub id: StructureId,
    pub ring: Vec<GeoPoint>,
    pub area_sq_ft: f64,
    pub perimeter_ft: f64,
    pub confidence: f64,
    pub included: bool,
}

impl From<&StructureRecord> for OutlineFeature {
    fn from(record: &StructureRecord) -> Self {
        Self {
            id: record.structure_id.clone(),
            ring: record.ring.clone(),
            area_sq_ft: record.area_sq_ft,
            perimeter_ft: record.perimeter_ft,
            confidence: record.confidence,
            included: record.included,
        }
    }
}

/// Structurally successful acquisition, including `manual_needed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionSuccess {
    pub success: bool,
    pub method: DetectionMethod,
    pub image_ref: ImageRef,
    pub bounding_box: BoundingBox,
    pub features: Vec<OutlineFeature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Infrastructure failure attributed to one pipeline step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionFailure {
    pub success: bool,
    pub step: FailureStep,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
    /// The requested site does not exist
    #[serde(skip)]
    pub not_found: bool,
}

impl AcquisitionFailure {
    pub fn new(step: FailureStep, err: &RooflineError) -> Self {
        Self {
            success: false,
            step,
            message: err.to_string(),
            details: error_details(err),
            not_found: matches!(err, RooflineError::SiteNotFound { .. }),
        }
    }

    pub fn from_error(err: &RooflineError) -> Self {
        Self::new(FailureStep::for_error(err), err)
    }
}

fn error_details(err: &RooflineError) -> Option<JsonValue> {
    match err {
        RooflineError::ConfigMissing { key } | RooflineError::ConfigInvalid { key, .. } => {
            Some(serde_json::json!({ "key": key }))
        }
        RooflineError::MissingField { field } => Some(serde_json::json!({ "field": field })),
        RooflineError::SiteNotFound { site_id } => Some(serde_json::json!({ "siteId": site_id })),
        RooflineError::DetectorFailed { detector, status, .. } => {
            Some(serde_json::json!({ "detector": detector, "status": status }))
        }
        _ => None,
    }
}

/// Wire response of the acquisition contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AcquisitionResponse {
    Success(AcquisitionSuccess),
    Failure(AcquisitionFailure),
}

impl AcquisitionResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, AcquisitionResponse::Success(_))
    }

    pub fn method(&self) -> Option<DetectionMethod> {
        match self {
            AcquisitionResponse::Success(success) => Some(success.method),
            AcquisitionResponse::Failure(_) => None,
        }
    }

    pub fn as_success(&self) -> Option<&AcquisitionSuccess> {
        match self {
            AcquisitionResponse::Success(success) => Some(success),
            AcquisitionResponse::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&AcquisitionFailure> {
        match self {
            AcquisitionResponse::Success(_) => None,
            AcquisitionResponse::Failure(failure) => Some(failure),
        }
    }
}

/// What happened when one detector was tried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum AttemptStatus {
    Failed { reason: String },
    /// Responded, but nothing reached the confidence threshold
    LowConfidence { discarded: usize },
    Accepted { kept: usize, discarded: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorAttempt {
    pub detector: String,
    #[serde(flatten)]
    pub status: AttemptStatus,
}

/// Result of the segmentation orchestrator; never an error
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationOutcome {
    pub method: DetectionMethod,
    pub candidates: Vec<CandidatePolygon>,
    pub attempts: Vec<DetectorAttempt>,
}

impl SegmentationOutcome {
    pub fn manual_needed(attempts: Vec<DetectorAttempt>) -> Self {
        Self { method: DetectionMethod::ManualNeeded, candidates: Vec::new(), attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_steps_by_error() {
        let cases = [
            (RooflineError::ConfigMissing { key: "k".into() }, "config"),
            (RooflineError::MissingField { field: "siteId".into() }, "input-validation"),
            (RooflineError::SiteNotFound { site_id: "x".into() }, "input-validation"),
            (RooflineError::ImageryUnavailable { reason: "down".into() }, "fetch-image"),
            (
                RooflineError::DetectorFailed { detector: "d".into(), status: None, reason: "r".into() },
                "inference",
            ),
            (RooflineError::InvalidGeometry { reason: "r".into() }, "polygon-validation"),
            (RooflineError::Storage("disk".into()), "persistence"),
        ];

        for (err, expected) in cases {
            assert_eq!(FailureStep::for_error(&err).as_str(), expected);
            let json = serde_json::to_value(FailureStep::for_error(&err)).unwrap();
            assert_eq!(json, expected);
        }
    }

    #[test]
    fn test_failure_wire_shape() {
        let failure =
            AcquisitionFailure::from_error(&RooflineError::SiteNotFound { site_id: "s-1".into() });
        assert!(failure.not_found);

        let json = serde_json::to_value(AcquisitionResponse::Failure(failure)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["step"], "input-validation");
        assert_eq!(json["details"]["siteId"], "s-1");
        assert!(json.get("notFound").is_none());
    }

    #[test]
    fn test_request_defaults() {
        let request: AcquisitionRequest = serde_json::from_str(r#"{"siteId":"a"}"#).unwrap();
        assert_eq!(request.site_id.as_deref(), Some("a"));
        assert_eq!(request.precision, PrecisionTier::Standard);

        let request: AcquisitionRequest =
            serde_json::from_str(r#"{"precision":"high"}"#).unwrap();
        assert!(request.site_id.is_none());
        assert_eq!(request.precision, PrecisionTier::High);
    }

    #[test]
    fn test_attempt_serialization() {
        let attempt = DetectorAttempt {
            detector: "roof-seg".into(),
            status: AttemptStatus::LowConfidence { discarded: 2 },
        };
        let json = serde_json::to_value(&attempt).unwrap();
        assert_eq!(json["detector"], "roof-seg");
        assert_eq!(json["status"], "low-confidence");
        assert_eq!(json["discarded"], 2);
    }
}
