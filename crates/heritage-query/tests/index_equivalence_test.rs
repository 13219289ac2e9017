//! Index-backed queries must agree with an exhaustive scan

use chrono::NaiveDate;
use heritage_core::models::{GeoPoint, HistoricalSite, Ring, SiteId};
use heritage_geo::spatial::{haversine_distance_km, point_in_polygon};
use heritage_geo::validation::validate_query_ring;
use heritage_query::QueryEngine;
use heritage_store::SpatialCatalog;
use proptest::prelude::*;
use std::sync::Arc;

fn catalog_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-11.0..-5.0f64, 51.0..56.0f64), 0..120)
}

fn engine_for(points: &[(f64, f64)]) -> (QueryEngine, Vec<HistoricalSite>) {
    let date = NaiveDate::from_ymd_opt(1922, 1, 1).unwrap();
    let sites: Vec<_> = points
        .iter()
        .enumerate()
        .map(|(i, &(lon, lat))| {
            HistoricalSite::new(SiteId(i as u64 + 1), format!("Site {}", i), date, GeoPoint::new(lon, lat))
        })
        .collect();
    let catalog = SpatialCatalog::from_parts(sites.clone(), vec![]).unwrap();
    (QueryEngine::new(Arc::new(catalog)), sites)
}

proptest! {
    #[test]
    fn test_nearby_matches_exhaustive_scan(
        points in catalog_strategy(),
        lon in -11.0..-5.0f64,
        lat in 51.0..56.0f64,
        radius in 0.5..300.0f64,
    ) {
        let (engine, sites) = engine_for(&points);
        let center = GeoPoint::new(lon, lat);

        let mut expected: Vec<_> = sites
            .iter()
            .filter(|s| haversine_distance_km(&s.location, &center) <= radius)
            .map(|s| s.id)
            .collect();
        expected.sort();

        let mut actual: Vec<_> =
            engine.nearby(center, radius).unwrap().sites.into_iter().map(|s| s.id).collect();
        actual.sort();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_nearby_is_radius_monotonic(
        points in catalog_strategy(),
        lon in -11.0..-5.0f64,
        lat in 51.0..56.0f64,
        small in 0.5..250.0f64,
        extra in 0.0..250.0f64,
    ) {
        let (engine, _) = engine_for(&points);
        let center = GeoPoint::new(lon, lat);

        let inner = engine.nearby(center, small).unwrap();
        let outer = engine.nearby(center, small + extra).unwrap();

        for site in &inner.sites {
            prop_assert!(outer.sites.iter().any(|s| s.id == site.id));
        }
    }

    #[test]
    fn test_polygon_matches_exhaustive_scan(
        points in catalog_strategy(),
        vertices in prop::collection::vec((-11.0..-5.0f64, 51.0..56.0f64), 3..8),
    ) {
        let ring = Ring::from_coords(&vertices.iter().map(|&(x, y)| [x, y]).collect::<Vec<_>>());
        prop_assume!(ring.distinct_vertex_count() >= 3);

        let (engine, sites) = engine_for(&points);
        let polygon = validate_query_ring(&ring).unwrap();

        let expected: Vec<_> = sites
            .iter()
            .filter(|s| point_in_polygon(&s.location, &polygon))
            .map(|s| s.id)
            .collect();
        let actual: Vec<_> =
            engine.within_polygon(&ring).unwrap().sites.into_iter().map(|s| s.id).collect();

        prop_assert_eq!(actual, expected);
    }
}
