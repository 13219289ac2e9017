use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use geojson::FeatureCollection;
use heritage_core::models::SiteId;
use heritage_query::{sites_collection, SiteDetail, SiteSummary, TimelineResponse};

use crate::dto::{SiteListParams, TimelineParams};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_sites(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SiteListParams>, QueryRejection>,
) -> Result<Json<Vec<SiteSummary>>, ApiError> {
    let Query(params) = params?;
    let filter = params.into_filter()?;
    tracing::debug!(?filter, "Listing sites");

    Ok(Json(state.engine.filter_sites(&filter)?))
}

pub async fn get_site(
    State(state): State<Arc<AppState>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<SiteDetail>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.engine.site(SiteId(id))?))
}

pub async fn timeline(
    State(state): State<Arc<AppState>>,
    params: Result<Query<TimelineParams>, QueryRejection>,
) -> Result<Json<TimelineResponse>, ApiError> {
    let Query(params) = params?;
    Ok(Json(state.engine.timeline(params.start_date, params.end_date)?))
}

pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, usize>>, ApiError> {
    Ok(Json(state.engine.category_counts()?))
}

pub async fn sites_geojson(State(state): State<Arc<AppState>>) -> Json<FeatureCollection> {
    let snapshot = state.engine.catalog().snapshot();
    Json(sites_collection(&snapshot))
}
