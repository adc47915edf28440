use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use roofline_core::config::LayeredConfig;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roofline_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roofline_api=info,roofline_detect=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();

    let mut config = LayeredConfig::with_defaults();
    if let Some(path) = &api_config.config_path {
        tracing::info!(path = %path.display(), "Loading configuration file");
        config = config
            .load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }
    let config = config.load_from_env();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        tracing::error!(
            "Remediation:\n\
            1. Keep ROOFLINE_MIN_CONFIDENCE within [0, 1]\n\
            2. Set ROOFLINE_PIXELS_PER_FOOT to a positive number\n\
            3. Use non-zero ROOFLINE_IMAGE_SIZE and ROOFLINE_TIMEOUT_SECS"
        );
        return Err(e.into());
    }

    tracing::info!(
        port = api_config.port,
        detectors = config.detectors.value.len(),
        pixels_per_foot = config.pixels_per_foot.value,
        "Starting Roofline API server"
    );

    let state = Arc::new(AppState::from_config(&config)?);

    let cors = CorsLayer::new()
        .allow_origin(
            api_config
                .cors_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin {}", api_config.cors_origin))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app).await?;

    Ok(())
}
