//! Heritage Geo - Geometry primitives, CRS transforms, and ingest validation
//!
//! This crate holds all of the spatial reasoning the query engine relies on:
//! great-circle distance, point-in-polygon containment, degree buffers,
//! vertex centroids, datum transformation, and the validation rules applied
//! before a site or boundary is admitted to the catalog.

pub mod models;
pub mod spatial;
pub mod transform;
pub mod validation;

pub use models::{polygons_from_geojson, polygons_to_geojson, to_geo_point, to_geo_polygon};
pub use spatial::{
    buffer_degrees, circle_polygon, haversine_distance_km, point_in_polygon, point_in_region,
    polygon_centroid, region_centroid, Containment, DEFAULT_BUFFER_SEGMENTS, KM_PER_DEGREE,
};
pub use transform::{crs_match, transform, CoordinateTransformer};
pub use validation::{validate_polygon, validate_query_ring, IngestValidator, ValidationResult};
