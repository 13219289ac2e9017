use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use heritage_core::config::LayeredConfig;
use heritage_store::{CatalogLoader, SpatialCatalog};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heritage_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heritage_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    let settings = config.settings().context("Invalid heritage configuration")?;

    tracing::info!(port = config.port, cors_origin = %config.cors_origin, "Starting heritage API server");

    let catalog = Arc::new(SpatialCatalog::new());
    load_catalog(&catalog, &config, &settings)?;

    let state = Arc::new(AppState::from_settings(Arc::clone(&catalog), &settings));

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid HERITAGE_CORS_ORIGIN '{}'", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state).layer(TraceLayer::new_for_http()).layer(cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Boundaries first, then sites, then enrichment
fn load_catalog(
    catalog: &SpatialCatalog,
    config: &ApiConfig,
    settings: &LayeredConfig,
) -> anyhow::Result<()> {
    let loader = CatalogLoader::from_config(catalog, settings);

    if let Some(path) = &config.boundaries_file {
        loader
            .load_boundaries_file(path)
            .with_context(|| format!("Failed to load boundaries from {}", path.display()))?;
    }
    if let Some(path) = &config.sites_file {
        loader
            .load_sites_file(path)
            .with_context(|| format!("Failed to load sites from {}", path.display()))?;
    }
    if let Some(path) = &config.enrich_file {
        loader
            .enrich_sites_file(path)
            .with_context(|| format!("Failed to enrich sites from {}", path.display()))?;
    }

    let stats = catalog.stats();
    if stats.total_sites == 0 {
        tracing::warn!("Catalog is empty; set HERITAGE_SITES_FILE to load sites");
    }
    tracing::info!(sites = stats.total_sites, regions = stats.total_regions, "Catalog ready");
    Ok(())
}
