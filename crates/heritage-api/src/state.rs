use std::sync::Arc;
use std::time::Duration;

use heritage_core::config::LayeredConfig;
use heritage_query::QueryEngine;
use heritage_store::SpatialCatalog;

/// Radii used when a request leaves them out
#[derive(Debug, Clone, Copy)]
pub struct RadiusDefaults {
    pub nearby_km: f64,
    pub buffer_km: f64,
}

impl Default for RadiusDefaults {
    fn default() -> Self {
        Self { nearby_km: 50.0, buffer_km: 20.0 }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: QueryEngine,
    pub defaults: RadiusDefaults,
}

impl AppState {
    pub fn new(engine: QueryEngine, defaults: RadiusDefaults) -> Self {
        Self { engine, defaults }
    }

    /// Engine limits, timeout and default radii from resolved settings
    pub fn from_settings(catalog: Arc<SpatialCatalog>, settings: &LayeredConfig) -> Self {
        let engine = QueryEngine::new(catalog)
            .with_limits(settings.query_limits())
            .with_timeout(settings.query_timeout_ms.value.map(Duration::from_millis));
        let defaults = RadiusDefaults {
            nearby_km: settings.default_nearby_radius_km.value,
            buffer_km: settings.default_buffer_radius_km.value,
        };
        Self::new(engine, defaults)
    }
}
