//! Integration tests for the batch loaders and catalog swaps

use heritage_core::error::HeritageError;
use heritage_core::models::{Crs, GeoPoint, GeographicEnvelope};
use heritage_geo::spatial::{point_in_region, region_centroid};
use heritage_geo::validation::IngestValidator;
use heritage_store::{CatalogLoader, SpatialCatalog};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::NamedTempFile;

fn itm_square(e: f64, n: f64, size: f64) -> String {
    format!(
        "[[[{e},{n}],[{e2},{n}],[{e2},{n2}],[{e},{n2}],[{e},{n}]]]",
        e = e,
        n = n,
        e2 = e + size,
        n2 = n + size
    )
}

fn feature(name_key: &str, name: &str, coordinates: &str) -> String {
    format!(
        r#"{{"type": "Feature", "properties": {{"{}": "{}"}},
            "geometry": {{"type": "Polygon", "coordinates": {}}}}}"#,
        name_key, name, coordinates
    )
}

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

fn boundaries_file() -> NamedTempFile {
    let features = [
        feature("COUNTY", "Dublin", &itm_square(705000.0, 725000.0, 20000.0)),
        feature("name", "  cork ", &itm_square(555000.0, 560000.0, 25000.0)),
        // Duplicate of Dublin under a different key
        feature("county", "DUBLIN", &itm_square(700000.0, 720000.0, 5000.0)),
        // Lands in the Atlantic once transformed
        feature("COUNTY", "Atlantis", &itm_square(100000.0, 100000.0, 10000.0)),
        r#"{"type": "Feature", "properties": {"COUNTY": "Ghost"}, "geometry": null}"#.to_string(),
        feature("OTHER", "Nameless", &itm_square(600000.0, 700000.0, 1000.0)),
    ];
    write_file(&format!(
        r#"{{"type": "FeatureCollection",
            "crs": {{"type": "name", "properties": {{"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}}}},
            "features": [{}]}}"#,
        features.join(",")
    ))
}

#[test]
fn test_boundary_file_load() {
    let catalog = SpatialCatalog::new();
    let file = boundaries_file();

    let summary = CatalogLoader::new(&catalog).load_boundaries_file(file.path()).unwrap();

    assert_eq!(summary.created, 2);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.skipped, 4);
    assert!(summary
        .failures
        .iter()
        .any(|f| f.item == "ATLANTIS" && f.reason.contains("out of range")));

    let dublin = catalog.region_by_name("dublin").unwrap();
    let centroid = region_centroid(&dublin).unwrap();
    assert!((centroid.lon + 6.26).abs() < 0.1, "centroid {}", centroid);
    assert!((centroid.lat - 53.35).abs() < 0.1, "centroid {}", centroid);
    assert!(point_in_region(&GeoPoint::new(-6.26, 53.35), &dublin));

    assert!(catalog.region_by_name("CORK").is_ok());
}

#[test]
fn test_boundary_reload_updates() {
    let catalog = SpatialCatalog::new();
    let file = boundaries_file();
    let loader = CatalogLoader::new(&catalog);

    loader.load_boundaries_file(file.path()).unwrap();
    let summary = loader.load_boundaries_file(file.path()).unwrap();

    assert_eq!((summary.created, summary.updated), (0, 2));
    assert_eq!(catalog.stats().total_regions, 2);
}

#[test]
fn test_wgs84_boundaries_with_custom_envelope() {
    let catalog = SpatialCatalog::new();
    let json = format!(
        r#"{{"type": "FeatureCollection", "features": [{}, {}]}}"#,
        feature("NAME", "Box", "[[[10.0,10.0],[11.0,10.0],[11.0,11.0],[10.0,11.0],[10.0,10.0]]]"),
        feature("NAME", "Flat", "[[[10.0,10.0],[11.0,10.0],[12.0,10.0],[10.0,10.0]]]")
    );

    let summary = CatalogLoader::new(&catalog)
        .with_boundary_crs(Crs::wgs84())
        .with_validator(IngestValidator::new(GeographicEnvelope::new(0.0, 20.0, 0.0, 20.0)))
        .load_boundaries_json(&json)
        .unwrap();

    assert_eq!(summary.created, 1);
    assert_eq!(summary.skipped, 1);
    assert!(summary.failures[0].reason.contains("zero area"));
}

#[test]
fn test_missing_file() {
    let catalog = SpatialCatalog::new();
    let err = CatalogLoader::new(&catalog)
        .load_sites_file(Path::new("/nonexistent/sites.json"))
        .unwrap_err();
    assert!(matches!(err, HeritageError::FileNotFound { .. }));
}

#[test]
fn test_sites_from_itm_file() {
    let catalog = SpatialCatalog::new();
    let file = write_file(
        r#"[{"event": "GPO", "date": "1916-04-24", "location": "Dublin",
             "latitude": 734697.593, "longitude": 715826.507,
             "significance": "HQ", "category": "Easter Rising", "type": "Occupation"},
            {"event": "Degrees", "date": "1916-04-24", "location": "Dublin",
             "latitude": 53.35, "longitude": -6.26,
             "significance": "", "category": "Easter Rising", "type": "Occupation"}]"#,
    );

    let summary = CatalogLoader::new(&catalog)
        .with_site_crs(Crs::irish_transverse_mercator())
        .load_sites_file(file.path())
        .unwrap();

    assert_eq!((summary.created, summary.skipped), (1, 1));
    let gpo = catalog.all_records().into_iter().next().unwrap();
    assert!((gpo.longitude() + 6.2603).abs() < 1e-4);
    assert!((gpo.latitude() - 53.3498).abs() < 1e-4);
}

#[test]
fn test_readers_never_see_partial_batch() {
    let catalog = Arc::new(SpatialCatalog::new());
    let batch_a: String = format!(
        "[{}]",
        (0..50)
            .map(|i| format!(
                r#"{{"event": "A{}", "date": "1922-01-01", "location": "", "latitude": 53.0,
                    "longitude": -7.0, "significance": "", "category": "Civil War", "type": "A"}}"#,
                i
            ))
            .collect::<Vec<_>>()
            .join(",")
    );

    let reader = {
        let catalog = Arc::clone(&catalog);
        thread::spawn(move || {
            for _ in 0..200 {
                let count = catalog.snapshot().site_count();
                assert!(count % 50 == 0, "observed partial batch of {}", count);
            }
        })
    };

    let writer = {
        let catalog = Arc::clone(&catalog);
        thread::spawn(move || {
            for round in 0..5 {
                let renamed = batch_a.replace("\"A", &format!("\"R{}-", round));
                CatalogLoader::new(&catalog).load_sites_json(&renamed).unwrap();
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(catalog.stats().total_sites, 250);
}
