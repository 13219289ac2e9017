//! Router tests driven through `tower::ServiceExt::oneshot`

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use heritage_api::{create_router, AppState, RadiusDefaults};
use heritage_core::models::{BoundaryRegion, Category, GeoPoint, HistoricalSite, Polygon, Ring, SiteId};
use heritage_query::QueryEngine;
use heritage_store::SpatialCatalog;
use serde_json::{json, Value};
use tower::ServiceExt;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn app() -> Router {
    let sites = vec![
        HistoricalSite::new(SiteId(1), "GPO", date(1916, 4, 24), GeoPoint::new(-6.2605, 53.3493))
            .with_category(Category::EasterRising)
            .with_event_type("Occupation"),
        HistoricalSite::new(
            SiteId(2),
            "Four Courts",
            date(1922, 6, 28),
            GeoPoint::new(-6.2735, 53.3457),
        )
        .with_event_type("Siege"),
        HistoricalSite::new(
            SiteId(3),
            "Beal na Blath",
            date(1922, 8, 22),
            GeoPoint::new(-8.9700, 51.8200),
        )
        .with_event_type("Ambush"),
    ];
    let dublin = BoundaryRegion::single(
        "Dublin",
        Polygon::from_ring(Ring::from_coords(&[
            [-6.3, 53.3],
            [-6.2, 53.3],
            [-6.2, 53.4],
            [-6.3, 53.4],
            [-6.3, 53.3],
        ])),
    );

    let catalog = SpatialCatalog::from_parts(sites, vec![dublin]).unwrap();
    let engine = QueryEngine::new(Arc::new(catalog));
    create_router(Arc::new(AppState::new(engine, RadiusDefaults::default())))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sites"], 3);
}

#[tokio::test]
async fn test_list_and_filter_sites() {
    let (status, body) = get("/api/sites").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["name"], "GPO");

    let (_, body) = get("/api/sites?county=dublin&category=CIVIL_WAR").await;
    let names: Vec<_> = body.as_array().unwrap().iter().map(|s| s["name"].clone()).collect();
    assert_eq!(names, vec![json!("Four Courts")]);

    let (_, body) = get("/api/sites?county=Atlantis").await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, body) = get("/api/sites?category=BOER_WAR").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid parameter");
}

#[tokio::test]
async fn test_site_detail() {
    let (status, body) = get("/api/sites/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category_display"], "Easter Rising (1916)");

    let (status, body) = get("/api/sites/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Site not found");

    let (status, _) = get("/api/sites/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_nearby_get_and_post() {
    let (status, body) = get("/api/sites/nearby?lat=53.3498&lng=-6.2603&radius_km=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["sites"][0]["name"], "GPO");
    assert!(body["sites"][0]["distance_km"].as_f64().unwrap() < 1.0);

    let (status, body) =
        post("/api/sites/nearby", json!({"lat": 53.3498, "lng": -6.2603})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["radius_km"], 50.0);

    let (status, body) = get("/api/sites/nearby?lat=95&lng=-6.26").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].as_str().unwrap().contains("latitude"));

    let (status, _) = get("/api/sites/nearby?lat=53.35&lng=-6.26&radius_km=501").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_in_polygon() {
    let ring = json!({"polygon": [[-6.3, 53.3], [-6.2, 53.3], [-6.2, 53.4], [-6.3, 53.4]]});
    let (status, body) = post("/api/sites/in_polygon", ring).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let degenerate = json!({"polygon": [[-6.3, 53.3], [-6.2, 53.3]]});
    let (status, body) = post("/api/sites/in_polygon", degenerate).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid geometry");
}

#[tokio::test]
async fn test_buffer_zone() {
    let (status, body) = get("/api/sites/buffer_zone?site_id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["center_site"], "GPO");
    assert_eq!(body["buffer_km"], 20.0);
    assert_eq!(body["count"], 1);
    assert_eq!(body["sites"][0]["name"], "Four Courts");

    let (status, _) = get("/api/sites/buffer_zone?site_id=1&buffer_km=150").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get("/api/sites/buffer_zone?site_id=99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_in_region() {
    let (status, body) = get("/api/sites/in_region?county=DUBLIN").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["region"], "DUBLIN");
    assert_eq!(body["count"], 2);

    let (status, _) = get("/api/sites/in_region?county=Kerry").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get("/api/sites/in_region").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_timeline_and_categories() {
    let (_, body) = get("/api/sites/timeline?start_date=1922-01-01").await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["date_range"]["start"], "1922-01-01");
    assert!(body["date_range"]["end"].is_null());

    let (_, body) = get("/api/sites/categories").await;
    assert_eq!(body["Civil War (1922-1923)"], 2);
    assert_eq!(body["Easter Rising (1916)"], 1);
}

#[tokio::test]
async fn test_geojson_endpoints() {
    let (_, body) = get("/api/sites/geojson").await;
    assert_eq!(body["type"], "FeatureCollection");
    assert_eq!(body["features"].as_array().unwrap().len(), 3);

    let (_, body) = get("/api/counties/geojson_with_colors").await;
    assert_eq!(body["features"][0]["properties"]["color"], "#FF6B6B");
    assert_eq!(body["features"][0]["geometry"]["type"], "Polygon");

    let (_, body) = get("/api/counties").await;
    assert_eq!(body[0]["name"], "DUBLIN");

    let (_, body) = get("/api/stats").await;
    assert_eq!(body["total_regions"], 1);
}
