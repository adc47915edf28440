//! Aerial imagery providers and the ordered chain that picks the first
//! one able to serve a bounding box.

use async_trait::async_trait;
use roofline_core::config::LayeredConfig;
use roofline_core::error::{Result, RooflineError};
use roofline_core::models::{AerialImage, BoundingBox};
use roofline_core::ports::ImageProvider;
use std::sync::Arc;
use std::time::Duration;

/// Imagery service addressed by a URL template.
///
/// Supported placeholders: `{west}`, `{south}`, `{east}`, `{north}`,
/// `{width}`, `{height}` and `{key}`.
pub struct HttpImageProvider {
    name: String,
    template: String,
    api_key: Option<String>,
    size: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpImageProvider {
    pub fn new(name: impl Into<String>, template: impl Into<String>, size: u32, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            api_key: None,
            size: size.max(1),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn render_url(&self, bbox: &BoundingBox) -> String {
        self.template
            .replace("{west}", &bbox.west.to_string())
            .replace("{south}", &bbox.south.to_string())
            .replace("{east}", &bbox.east.to_string())
            .replace("{north}", &bbox.north.to_string())
            .replace("{width}", &self.size.to_string())
            .replace("{height}", &self.size.to_string())
            .replace("{key}", self.api_key.as_deref().unwrap_or_default())
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> RooflineError {
        RooflineError::ImageryUnavailable { reason: format!("{}: {}", self.name, reason) }
    }
}

#[async_trait]
impl ImageProvider for HttpImageProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        !self.template.contains("{key}") || self.api_key.is_some()
    }

    async fn fetch(&self, bbox: &BoundingBox) -> Result<AerialImage> {
        let response = self
            .client
            .get(self.render_url(bbox))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !response.status().is_success() {
            return Err(self.unavailable(format!("HTTP {}", response.status())));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(self.unavailable(format!("unexpected content type {}", content_type)));
        }

        let bytes = response.bytes().await.map_err(|e| self.unavailable(e))?;
        if bytes.is_empty() {
            return Err(self.unavailable("empty image"));
        }

        Ok(AerialImage {
            bytes: bytes.to_vec(),
            content_type,
            provider: self.name.clone(),
            bbox: *bbox,
            width: self.size,
            height: self.size,
        })
    }
}

/// Providers tried in order; the first image wins
#[derive(Clone, Default)]
pub struct ImageryChain {
    providers: Vec<Arc<dyn ImageProvider>>,
}

impl ImageryChain {
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>) -> Self {
        Self { providers }
    }

    /// Preferred high-resolution provider (when configured), then the basemap
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let size = config.image_size.value;
        let timeout = Duration::from_secs(config.timeout_secs.value);
        let mut providers: Vec<Arc<dyn ImageProvider>> = Vec::new();

        if let Some((url, key)) = config.preferred_imagery()? {
            providers.push(Arc::new(
                HttpImageProvider::new("preferred", url, size, timeout).with_api_key(key),
            ));
        }
        providers.push(Arc::new(HttpImageProvider::new(
            "basemap",
            config.basemap_url.value.clone(),
            size,
            timeout,
        )));

        Ok(Self::new(providers))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

#[async_trait]
impl ImageProvider for ImageryChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn is_configured(&self) -> bool {
        self.providers.iter().any(|p| p.is_configured())
    }

    async fn fetch(&self, bbox: &BoundingBox) -> Result<AerialImage> {
        let mut failures = Vec::new();

        for provider in self.providers.iter().filter(|p| p.is_configured()) {
            match provider.fetch(bbox).await {
                Ok(image) => {
                    tracing::debug!(provider = provider.name(), bytes = image.bytes.len(), "Fetched imagery");
                    return Ok(image);
                }
                Err(err) => {
                    tracing::warn!(provider = provider.name(), error = %err, "Imagery provider failed");
                    failures.push(err.to_string());
                }
            }
        }

        Err(RooflineError::ImageryUnavailable {
            reason: if failures.is_empty() {
                "no imagery provider configured".to_string()
            } else {
                failures.join("; ")
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roofline_core::config::ConfigOverrides;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        name: &'static str,
        fails: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageProvider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, bbox: &BoundingBox) -> Result<AerialImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fails {
                return Err(RooflineError::ImageryUnavailable { reason: format!("{} down", self.name) });
            }
            Ok(AerialImage {
                bytes: vec![1],
                content_type: "image/jpeg".to_string(),
                provider: self.name.to_string(),
                bbox: *bbox,
                width: 256,
                height: 256,
            })
        }
    }

    fn stub(name: &'static str, fails: bool) -> Arc<StubProvider> {
        Arc::new(StubProvider { name, fails, calls: AtomicUsize::new(0) })
    }

    fn bbox() -> BoundingBox {
        BoundingBox::new(-97.5, 32.25, -97.25, 32.5)
    }

    #[test]
    fn test_render_url_fills_placeholders() {
        let provider = HttpImageProvider::new(
            "tiles",
            "https://img.test/{west},{south},{east},{north}/{width}x{height}?k={key}",
            512,
            Duration::from_secs(1),
        )
        .with_api_key(Some("abc".to_string()));

        assert_eq!(
            provider.render_url(&bbox()),
            "https://img.test/-97.5,32.25,-97.25,32.5/512x512?k=abc"
        );
    }

    #[test]
    fn test_keyed_template_without_key_is_not_configured() {
        let provider =
            HttpImageProvider::new("tiles", "https://img.test/?k={key}", 512, Duration::from_secs(1));
        assert!(!provider.is_configured());
    }

    #[tokio::test]
    async fn test_chain_falls_back_to_next_provider() {
        let preferred = stub("preferred", true);
        let basemap = stub("basemap", false);
        let chain = ImageryChain::new(vec![preferred.clone() as Arc<dyn ImageProvider>, basemap.clone()]);

        let image = chain.fetch(&bbox()).await.unwrap();

        assert_eq!(image.provider, "basemap");
        assert_eq!(preferred.calls.load(Ordering::SeqCst), 1);
        assert_eq!(basemap.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chain_reports_every_failure() {
        let chain = ImageryChain::new(vec![stub("a", true) as Arc<dyn ImageProvider>, stub("b", true)]);

        let err = chain.fetch(&bbox()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("a down") && message.contains("b down"));
    }

    #[tokio::test]
    async fn test_empty_chain_is_unconfigured() {
        let chain = ImageryChain::default();
        assert!(!chain.is_configured());
        assert!(matches!(chain.fetch(&bbox()).await, Err(RooflineError::ImageryUnavailable { .. })));
    }

    #[test]
    fn test_chain_from_config_orders_preferred_first() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(ImageryChain::from_config(&config).unwrap().provider_names(), vec!["basemap"]);

        let mut config = LayeredConfig::with_defaults();
        config.apply_overrides(ConfigOverrides {
            imagery_url: Some("https://hires.test/{west}/{north}".to_string()),
            ..Default::default()
        });
        assert_eq!(
            ImageryChain::from_config(&config).unwrap().provider_names(),
            vec!["preferred", "basemap"]
        );
    }

    #[test]
    fn test_chain_from_config_requires_key_for_keyed_template() {
        let mut config = LayeredConfig::with_defaults();
        config.apply_overrides(ConfigOverrides {
            imagery_url: Some("https://hires.test/?key={key}".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            ImageryChain::from_config(&config),
            Err(RooflineError::ConfigMissing { .. })
        ));
    }
}
