use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roofline_core::error::RooflineError;
use roofline_detect::{AcquisitionFailure, FailureStep};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RooflineError> for ApiError {
    fn from(err: RooflineError) -> Self {
        match &err {
            RooflineError::SiteNotFound { .. } => Self::not_found("Site not found").with_details(err.to_string()),
            RooflineError::MissingField { .. }
            | RooflineError::InvalidGeometry { .. }
            | RooflineError::ConfigInvalid { .. } => Self::bad_request("Invalid request").with_details(err.to_string()),
            _ => Self::internal("Internal error").with_details(err.to_string()),
        }
    }
}

/// HTTP status for a step-tagged acquisition failure
pub fn failure_status(failure: &AcquisitionFailure) -> StatusCode {
    match failure.step {
        FailureStep::Config | FailureStep::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        FailureStep::InputValidation if failure.not_found => StatusCode::NOT_FOUND,
        FailureStep::InputValidation => StatusCode::BAD_REQUEST,
        FailureStep::FetchImage | FailureStep::Inference => StatusCode::BAD_GATEWAY,
        FailureStep::PolygonValidation | FailureStep::DriftCheck => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_status_by_step() {
        let unknown = AcquisitionFailure::from_error(&RooflineError::SiteNotFound { site_id: "x".into() });
        assert_eq!(failure_status(&unknown), StatusCode::NOT_FOUND);

        let missing = AcquisitionFailure::from_error(&RooflineError::MissingField { field: "siteId".into() });
        assert_eq!(failure_status(&missing), StatusCode::BAD_REQUEST);

        let fetch = AcquisitionFailure::from_error(&RooflineError::ImageryUnavailable { reason: "down".into() });
        assert_eq!(failure_status(&fetch), StatusCode::BAD_GATEWAY);

        let storage = AcquisitionFailure::from_error(&RooflineError::Storage("full".into()));
        assert_eq!(failure_status(&storage), StatusCode::INTERNAL_SERVER_ERROR);

        let geometry = AcquisitionFailure::from_error(&RooflineError::InvalidGeometry { reason: "r".into() });
        assert_eq!(failure_status(&geometry), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
