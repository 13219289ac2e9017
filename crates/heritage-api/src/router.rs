use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Sites
        .route("/api/sites", get(handlers::list_sites))
        .route("/api/sites/{id}", get(handlers::get_site))
        .route("/api/sites/geojson", get(handlers::sites_geojson))
        .route("/api/sites/timeline", get(handlers::timeline))
        .route("/api/sites/categories", get(handlers::categories))

        // Spatial queries
        .route("/api/sites/nearby", get(handlers::nearby).post(handlers::nearby_post))
        .route("/api/sites/in_polygon", post(handlers::in_polygon))
        .route("/api/sites/buffer_zone", get(handlers::buffer_zone))
        .route("/api/sites/in_region", get(handlers::in_region))

        // Counties
        .route("/api/counties", get(handlers::list_counties))
        .route("/api/counties/geojson", get(handlers::counties_geojson))
        .route("/api/counties/geojson_with_colors", get(handlers::counties_geojson_with_colors))

        .route("/api/stats", get(handlers::stats))

        .with_state(state)
}
