use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use heritage_query::{BufferResponse, NearbyResponse, PolygonResponse, RegionResponse};

use crate::dto::{BufferParams, NearbyParams, PolygonRequest, RegionParams};
use crate::error::ApiError;
use crate::state::AppState;

fn run_nearby(state: &AppState, params: NearbyParams) -> Result<Json<NearbyResponse>, ApiError> {
    let center = params.center()?;
    let radius_km = params.radius_km.unwrap_or(state.defaults.nearby_km);
    tracing::info!(center = %center, radius_km, "Proximity search");

    Ok(Json(state.engine.nearby(center, radius_km)?))
}

pub async fn nearby(
    State(state): State<Arc<AppState>>,
    params: Result<Query<NearbyParams>, QueryRejection>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let Query(params) = params?;
    run_nearby(&state, params)
}

pub async fn nearby_post(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NearbyParams>, JsonRejection>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let Json(params) = body?;
    run_nearby(&state, params)
}

pub async fn in_polygon(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PolygonRequest>, JsonRejection>,
) -> Result<Json<PolygonResponse>, ApiError> {
    let Json(request) = body?;
    tracing::info!(vertices = request.polygon.len(), "Polygon search");

    Ok(Json(state.engine.within_polygon(&request.ring())?))
}

pub async fn buffer_zone(
    State(state): State<Arc<AppState>>,
    params: Result<Query<BufferParams>, QueryRejection>,
) -> Result<Json<BufferResponse>, ApiError> {
    let Query(params) = params?;
    let buffer_km = params.buffer_km.unwrap_or(state.defaults.buffer_km);
    let site_id = params.site_id()?;
    tracing::info!(site_id = %site_id, buffer_km, "Buffer-zone search");

    Ok(Json(state.engine.within_buffer(site_id, buffer_km)?))
}

pub async fn in_region(
    State(state): State<Arc<AppState>>,
    params: Result<Query<RegionParams>, QueryRejection>,
) -> Result<Json<RegionResponse>, ApiError> {
    let Query(params) = params?;
    let county = params.county()?;
    tracing::info!(county = %county, "Region search");

    Ok(Json(state.engine.within_region(&county)?))
}
