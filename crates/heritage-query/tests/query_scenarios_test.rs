//! End-to-end query scenarios over a small catalog

use chrono::NaiveDate;
use heritage_core::error::HeritageError;
use heritage_core::models::{BoundaryRegion, GeoPoint, HistoricalSite, Polygon, Ring, SiteId};
use heritage_query::QueryEngine;
use heritage_store::SpatialCatalog;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dublin_square() -> BoundaryRegion {
    BoundaryRegion::single(
        "DUBLIN",
        Polygon::from_ring(Ring::from_coords(&[
            [-6.3, 53.3],
            [-6.2, 53.3],
            [-6.2, 53.4],
            [-6.3, 53.4],
            [-6.3, 53.3],
        ])),
    )
}

fn engine() -> QueryEngine {
    let sites = vec![
        HistoricalSite::new(SiteId(1), "GPO", date(1916, 4, 24), GeoPoint::new(-6.2605, 53.3493)),
        HistoricalSite::new(
            SiteId(2),
            "Four Courts",
            date(1922, 6, 28),
            GeoPoint::new(-6.25, 53.35),
        ),
        HistoricalSite::new(
            SiteId(3),
            "Beal na Blath",
            date(1922, 8, 22),
            GeoPoint::new(-8.9700, 51.8200),
        ),
    ];
    let catalog = SpatialCatalog::from_parts(sites, vec![dublin_square()]).unwrap();
    QueryEngine::new(Arc::new(catalog))
}

#[test]
fn test_nearby_finds_site_under_one_km() {
    let response = engine().nearby(GeoPoint::new(-6.2603, 53.3498), 5.0).unwrap();

    let gpo = response.sites.iter().find(|s| s.id == SiteId(1)).unwrap();
    assert!(gpo.distance_km.unwrap() < 1.0);
    assert_eq!(response.sites[0].id, SiteId(1));
    assert!(response.sites.iter().all(|s| s.id != SiteId(3)));
}

#[test]
fn test_nearby_tiny_radius_includes_exact_point() {
    let response = engine().nearby(GeoPoint::new(-6.2605, 53.3493), 0.001).unwrap();
    assert_eq!(response.count, 1);
    assert_eq!(response.sites[0].id, SiteId(1));
    assert_eq!(response.sites[0].distance_km, Some(0.0));
}

#[test]
fn test_nearby_invalid_coordinates() {
    let engine = engine();
    for center in [GeoPoint::new(-6.26, 95.0), GeoPoint::new(200.0, 53.35)] {
        let err = engine.nearby(center, 5.0).unwrap_err();
        assert!(matches!(err, HeritageError::InvalidParameter { .. }), "{}", err);
    }
}

#[test]
fn test_region_lookup_is_case_insensitive() {
    let response = engine().within_region("dublin").unwrap();
    assert_eq!(response.region, "DUBLIN");

    let ids: Vec<_> = response.sites.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![SiteId(1), SiteId(2)]);

    assert!(matches!(
        engine().within_region("Kerry"),
        Err(HeritageError::NotFound { .. })
    ));
}

#[test]
fn test_buffer_excludes_center() {
    let response = engine().within_buffer(SiteId(1), 20.0).unwrap();
    assert_eq!(response.center_site, "GPO");
    assert!(response.sites.iter().all(|s| s.id != SiteId(1)));
    assert_eq!(response.count, 1);
    assert_eq!(response.sites[0].id, SiteId(2));
}

#[test]
fn test_polygon_results_are_repeatable() {
    let engine = engine();
    let ring = Ring::from_coords(&[[-7.0, 53.0], [-6.0, 53.0], [-6.0, 54.0], [-7.0, 54.0]]);

    let first = engine.within_polygon(&ring).unwrap();
    let second = engine.within_polygon(&ring).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.count, 2);
}

#[test]
fn test_queries_see_a_consistent_snapshot_after_reload() {
    let engine = engine();
    let before = engine.stats().version;

    engine
        .catalog()
        .upsert_record(HistoricalSite::new(
            SiteId(4),
            "City Hall",
            date(1916, 4, 24),
            GeoPoint::new(-6.2672, 53.3440),
        ))
        .unwrap();

    assert_eq!(engine.stats().version, before + 1);
    assert_eq!(engine.within_region("Dublin").unwrap().count, 3);
}
