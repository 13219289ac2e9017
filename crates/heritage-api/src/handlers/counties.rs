use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use geojson::FeatureCollection;
use heritage_query::{colored_regions_collection, regions_collection, RegionSummary};
use heritage_store::CatalogStats;

use crate::state::AppState;

pub async fn list_counties(State(state): State<Arc<AppState>>) -> Json<Vec<RegionSummary>> {
    Json(state.engine.regions())
}

pub async fn counties_geojson(State(state): State<Arc<AppState>>) -> Json<FeatureCollection> {
    let snapshot = state.engine.catalog().snapshot();
    Json(regions_collection(&snapshot))
}

pub async fn counties_geojson_with_colors(
    State(state): State<Arc<AppState>>,
) -> Json<FeatureCollection> {
    let snapshot = state.engine.catalog().snapshot();
    Json(colored_regions_collection(&snapshot))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<CatalogStats> {
    Json(state.engine.stats())
}
