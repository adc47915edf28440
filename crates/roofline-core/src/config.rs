use crate::error::{Result, RooflineError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Lower-resolution general basemap used when no preferred provider answers.
/// `imageSR=4326` keeps the returned raster linear in longitude/latitude.
pub const DEFAULT_BASEMAP_URL: &str = "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/export?bbox={west},{south},{east},{north}&bboxSR=4326&imageSR=4326&size={width},{height}&format=png&f=image";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided programmatically by the host application
    Override,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Override => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// A remote detector endpoint, tried in list order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorEndpoint {
    pub name: String,
    pub url: String,
}

/// Layered configuration for the acquisition pipeline and editor defaults
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Preferred high-resolution imagery URL template
    pub imagery_url: ConfigValue<Option<String>>,
    pub imagery_api_key: ConfigValue<Option<String>>,
    /// General basemap URL template, tried after the preferred provider
    pub basemap_url: ConfigValue<String>,
    pub detectors: ConfigValue<Vec<DetectorEndpoint>>,
    pub detector_api_key: ConfigValue<Option<String>>,
    /// Inclusion/acceptance threshold for polygon confidence
    pub min_confidence: ConfigValue<f64>,
    pub timeout_secs: ConfigValue<u64>,
    pub pixels_per_foot: ConfigValue<f64>,
    /// Requested image edge length in pixels
    pub image_size: ConfigValue<u32>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            imagery_url: ConfigValue::new(None, ConfigSource::Default),
            imagery_api_key: ConfigValue::new(None, ConfigSource::Default),
            basemap_url: ConfigValue::new(DEFAULT_BASEMAP_URL.to_string(), ConfigSource::Default),
            detectors: ConfigValue::new(Vec::new(), ConfigSource::Default),
            detector_api_key: ConfigValue::new(None, ConfigSource::Default),
            min_confidence: ConfigValue::new(0.7, ConfigSource::Default),
            timeout_secs: ConfigValue::new(30, ConfigSource::Default),
            pixels_per_foot: ConfigValue::new(10.0, ConfigSource::Default),
            image_size: ConfigValue::new(1024, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| RooflineError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| RooflineError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(url) = file_config.imagery_url {
            self.imagery_url.update(Some(url), ConfigSource::File);
        }
        if let Some(key) = file_config.imagery_api_key {
            self.imagery_api_key.update(Some(key), ConfigSource::File);
        }
        if let Some(url) = file_config.basemap_url {
            self.basemap_url.update(url, ConfigSource::File);
        }
        if let Some(detectors) = file_config.detectors {
            self.detectors.update(detectors, ConfigSource::File);
        }
        if let Some(key) = file_config.detector_api_key {
            self.detector_api_key.update(Some(key), ConfigSource::File);
        }
        if let Some(min_confidence) = file_config.min_confidence {
            self.min_confidence.update(min_confidence, ConfigSource::File);
        }
        if let Some(timeout_secs) = file_config.timeout_secs {
            self.timeout_secs.update(timeout_secs, ConfigSource::File);
        }
        if let Some(pixels_per_foot) = file_config.pixels_per_foot {
            self.pixels_per_foot.update(pixels_per_foot, ConfigSource::File);
        }
        if let Some(image_size) = file_config.image_size {
            self.image_size.update(image_size, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(url) = env::var("ROOFLINE_IMAGERY_URL") {
            self.imagery_url.update(Some(url), ConfigSource::Environment);
        }

        if let Ok(key) = env::var("ROOFLINE_IMAGERY_API_KEY") {
            self.imagery_api_key.update(Some(key), ConfigSource::Environment);
        }

        if let Ok(url) = env::var("ROOFLINE_BASEMAP_URL") {
            self.basemap_url.update(url, ConfigSource::Environment);
        }

        if let Ok(list) = env::var("ROOFLINE_DETECTORS") {
            self.detectors.update(parse_detector_list(&list), ConfigSource::Environment);
        }

        if let Ok(key) = env::var("ROOFLINE_DETECTOR_API_KEY") {
            self.detector_api_key.update(Some(key), ConfigSource::Environment);
        }

        if let Ok(value) = env::var("ROOFLINE_MIN_CONFIDENCE") {
            match value.parse::<f64>() {
                Ok(v) => self.min_confidence.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ROOFLINE_MIN_CONFIDENCE value '{}': expected a number in [0, 1]",
                    value
                ),
            }
        }

        if let Ok(value) = env::var("ROOFLINE_TIMEOUT_SECS") {
            match value.parse::<u64>() {
                Ok(v) => self.timeout_secs.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ROOFLINE_TIMEOUT_SECS value '{}': expected whole seconds",
                    value
                ),
            }
        }

        if let Ok(value) = env::var("ROOFLINE_PIXELS_PER_FOOT") {
            match value.parse::<f64>() {
                Ok(v) => self.pixels_per_foot.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ROOFLINE_PIXELS_PER_FOOT value '{}': expected a positive number",
                    value
                ),
            }
        }

        if let Ok(value) = env::var("ROOFLINE_IMAGE_SIZE") {
            match value.parse::<u32>() {
                Ok(v) => self.image_size.update(v, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ROOFLINE_IMAGE_SIZE value '{}': expected pixels",
                    value
                ),
            }
        }

        self
    }

    /// Apply host-provided overrides (highest precedence)
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.imagery_url {
            self.imagery_url.update(Some(url), ConfigSource::Override);
        }
        if let Some(key) = overrides.imagery_api_key {
            self.imagery_api_key.update(Some(key), ConfigSource::Override);
        }
        if let Some(detectors) = overrides.detectors {
            self.detectors.update(detectors, ConfigSource::Override);
        }
        if let Some(min_confidence) = overrides.min_confidence {
            self.min_confidence.update(min_confidence, ConfigSource::Override);
        }
        if let Some(pixels_per_foot) = overrides.pixels_per_foot {
            self.pixels_per_foot.update(pixels_per_foot, ConfigSource::Override);
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let min_confidence = self.min_confidence.value;
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(RooflineError::ConfigInvalid {
                key: "min_confidence".to_string(),
                reason: format!("{} is outside [0, 1]", min_confidence),
            });
        }

        if !(self.pixels_per_foot.value.is_finite() && self.pixels_per_foot.value > 0.0) {
            return Err(RooflineError::ConfigInvalid {
                key: "pixels_per_foot".to_string(),
                reason: format!("{} must be a positive number", self.pixels_per_foot.value),
            });
        }

        if self.image_size.value == 0 {
            return Err(RooflineError::ConfigInvalid {
                key: "image_size".to_string(),
                reason: "must be at least 1 pixel".to_string(),
            });
        }

        if self.timeout_secs.value == 0 {
            return Err(RooflineError::ConfigInvalid {
                key: "timeout_secs".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    /// The preferred imagery provider, if one is configured.
    ///
    /// A template that needs `{key}` without an API key is a configuration
    /// error rather than a provider that silently fails on every request.
    pub fn preferred_imagery(&self) -> Result<Option<(String, Option<String>)>> {
        let Some(url) = self.imagery_url.value.clone() else {
            return Ok(None);
        };

        let key = self.imagery_api_key.value.clone();
        if url.contains("{key}") && key.is_none() {
            return Err(RooflineError::ConfigMissing { key: "imagery_api_key".to_string() });
        }

        Ok(Some((url, key)))
    }

    /// Get all configuration values as a map for inspection; secrets are redacted
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "imagery_url".to_string(),
            (
                self.imagery_url.value.clone().unwrap_or_else(|| "(none)".to_string()),
                self.imagery_url.source,
            ),
        );
        map.insert(
            "imagery_api_key".to_string(),
            (redact(&self.imagery_api_key.value), self.imagery_api_key.source),
        );
        map.insert(
            "basemap_url".to_string(),
            (self.basemap_url.value.clone(), self.basemap_url.source),
        );
        map.insert(
            "detectors".to_string(),
            (
                self.detectors
                    .value
                    .iter()
                    .map(|d| format!("{}={}", d.name, d.url))
                    .collect::<Vec<_>>()
                    .join(","),
                self.detectors.source,
            ),
        );
        map.insert(
            "detector_api_key".to_string(),
            (redact(&self.detector_api_key.value), self.detector_api_key.source),
        );
        map.insert(
            "min_confidence".to_string(),
            (self.min_confidence.value.to_string(), self.min_confidence.source),
        );
        map.insert(
            "timeout_secs".to_string(),
            (self.timeout_secs.value.to_string(), self.timeout_secs.source),
        );
        map.insert(
            "pixels_per_foot".to_string(),
            (self.pixels_per_foot.value.to_string(), self.pixels_per_foot.source),
        );
        map.insert(
            "image_size".to_string(),
            (self.image_size.value.to_string(), self.image_size.source),
        );

        map
    }
}

fn redact(secret: &Option<String>) -> String {
    match secret {
        Some(_) => "********".to_string(),
        None => "(none)".to_string(),
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    imagery_url: Option<String>,
    imagery_api_key: Option<String>,
    basemap_url: Option<String>,
    detectors: Option<Vec<DetectorEndpoint>>,
    detector_api_key: Option<String>,
    min_confidence: Option<f64>,
    timeout_secs: Option<u64>,
    pixels_per_foot: Option<f64>,
    image_size: Option<u32>,
}

/// Programmatic overrides from the host application
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub imagery_url: Option<String>,
    pub imagery_api_key: Option<String>,
    pub detectors: Option<Vec<DetectorEndpoint>>,
    pub min_confidence: Option<f64>,
    pub pixels_per_foot: Option<f64>,
}

/// Parse a comma-separated detector list: `name=url` entries or bare URLs
pub fn parse_detector_list(s: &str) -> Vec<DetectorEndpoint> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(i, entry)| match entry.split_once('=') {
            Some((name, url)) if !name.contains('/') && !name.contains(':') => DetectorEndpoint {
                name: name.trim().to_string(),
                url: url.trim().to_string(),
            },
            _ => DetectorEndpoint { name: format!("detector-{}", i + 1), url: entry.to_string() },
        })
        .collect()
}
