//! Error types for Roofline

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RooflineError {
    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Request errors
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Site not found: {site_id}")]
    SiteNotFound { site_id: String },

    // Imagery errors
    #[error("Imagery unavailable: {reason}")]
    ImageryUnavailable { reason: String },

    // Detector errors
    #[error("Detector '{detector}' failed{}: {reason}", status_suffix(.status))]
    DetectorFailed {
        detector: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RooflineError {
    /// True when a detector reported that its model does not exist.
    pub fn is_model_missing(&self) -> bool {
        matches!(self, RooflineError::DetectorFailed { status: Some(404), .. })
    }
}

impl From<serde_json::Error> for RooflineError {
    fn from(err: serde_json::Error) -> Self {
        RooflineError::Serialization(err.to_string())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (HTTP {code})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, RooflineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_error_mentions_status() {
        let err = RooflineError::DetectorFailed {
            detector: "roof-seg".to_string(),
            status: Some(404),
            reason: "model not found".to_string(),
        };
        assert_eq!(err.to_string(), "Detector 'roof-seg' failed (HTTP 404): model not found");
        assert!(err.is_model_missing());
    }

    #[test]
    fn test_detector_error_without_status() {
        let err = RooflineError::DetectorFailed {
            detector: "roof-seg".to_string(),
            status: None,
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Detector 'roof-seg' failed: connection refused");
        assert!(!err.is_model_missing());
    }
}
