use async_trait::async_trait;
use roofline_core::config::DetectorEndpoint;
use roofline_core::error::{Result, RooflineError};
use roofline_core::models::{AerialImage, CandidatePolygon, PixelPoint};
use roofline_core::ports::Detector;
use roofline_geo::Georeference;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote segmentation service reached over HTTP.
///
/// The raw image bytes are posted as the request body; predictions come back
/// as pixel rings relative to the submitted image.
pub struct HttpDetector {
    name: String,

    /// Inference endpoint (e.g., "https://detect.example.com/models/roofs/1")
    url: String,

    /// Sent as a bearer token when present
    api_key: Option<String>,

    timeout: Duration,

    client: reqwest::Client,
}

impl HttpDetector {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            api_key,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_endpoint(endpoint: &DetectorEndpoint, api_key: Option<String>, timeout: Duration) -> Self {
        Self::new(endpoint.name.clone(), endpoint.url.clone(), api_key, timeout)
    }

    fn failure(&self, status: Option<u16>, reason: impl Into<String>) -> RooflineError {
        RooflineError::DetectorFailed {
            detector: self.name.clone(),
            status,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Detector for HttpDetector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn infer(&self, image: &AerialImage) -> Result<Vec<CandidatePolygon>> {
        let mut request = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .header(reqwest::header::CONTENT_TYPE, image.content_type.as_str())
            .body(image.bytes.clone());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.failure(None, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.failure(Some(status.as_u16()), format!("{}: {}", status, error_text)));
        }

        let body: DetectionResponse = response
            .json()
            .await
            .map_err(|e| self.failure(None, format!("unreadable response: {}", e)))?;

        let georef = Georeference::new(image.bbox, image.width, image.height);
        Ok(predictions_to_candidates(&self.name, &body, &georef))
    }
}

/// Response body of a segmentation service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Outline in image pixels
    pub points: Vec<PixelPoint>,
    pub confidence: f64,
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Georeference pixel predictions; rings with fewer than 3 points are dropped
pub fn predictions_to_candidates(
    detector: &str,
    response: &DetectionResponse,
    georef: &Georeference,
) -> Vec<CandidatePolygon> {
    response
        .predictions
        .iter()
        .filter(|p| {
            let usable = p.points.len() >= 3 && p.confidence.is_finite();
            if !usable {
                tracing::debug!(detector, points = p.points.len(), "Dropping degenerate prediction");
            }
            usable
        })
        .map(|p| {
            let ring = p.points.iter().map(|pt| georef.pixel_to_geo(pt)).collect();
            let source = match &p.label {
                Some(label) => format!("{}:{}", detector, label),
                None => detector.to_string(),
            };
            CandidatePolygon::new(ring, p.confidence, source)
        })
        .collect()
}
