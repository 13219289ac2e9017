//! Geometry primitives: distance, containment, buffers and centroids.
//!
//! All functions take WGS84 degrees and are pure.

use crate::models::{to_geo_coord, to_geo_point, to_geo_polygon};
use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Distance, Haversine};
use heritage_core::models::{BoundaryRegion, BoundingBox, GeoPoint, Polygon, Ring};
use std::f64::consts::PI;

/// Flat degree conversion used for buffers
pub const KM_PER_DEGREE: f64 = 111.0;

/// Vertex count of a buffer circle, closing vertex excluded
pub const DEFAULT_BUFFER_SEGMENTS: usize = 32;

/// Great-circle distance in kilometres on the mean Earth sphere.
///
/// Symmetric, and exactly zero for identical points.
pub fn haversine_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    Haversine.distance(to_geo_point(a), to_geo_point(b)) / 1000.0
}

/// Point-in-polygon with boundary points counted as inside.
///
/// Holes exclude their interior only; a point on a hole edge is inside.
pub fn point_in_polygon(point: &GeoPoint, polygon: &Polygon) -> bool {
    Containment::polygon(polygon).contains(point)
}

/// Inside any part of the region
pub fn point_in_region(point: &GeoPoint, region: &BoundaryRegion) -> bool {
    Containment::region(region).contains(point)
}

/// A containment test prepared once and applied to many points.
///
/// Parts are tested independently so that a point on an edge shared by two
/// parts still counts as inside.
#[derive(Debug, Clone)]
pub struct Containment {
    parts: Vec<(geo::Polygon<f64>, Option<BoundingBox>)>,
}

impl Containment {
    pub fn polygon(polygon: &Polygon) -> Self {
        Self::from_parts(std::slice::from_ref(polygon))
    }

    pub fn region(region: &BoundaryRegion) -> Self {
        Self::from_parts(&region.parts)
    }

    pub fn from_parts(parts: &[Polygon]) -> Self {
        Self {
            parts: parts.iter().map(|p| (to_geo_polygon(p), p.bounding_box())).collect(),
        }
    }

    /// Union of the part bounding boxes
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.parts
            .iter()
            .filter_map(|(_, bbox)| *bbox)
            .reduce(|acc, bbox| acc.merge(&bbox))
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        let coord = to_geo_coord(point);
        self.parts.iter().any(|(shape, bbox)| {
            bbox.is_some_and(|b| b.contains(point))
                && !matches!(shape.coordinate_position(&coord), CoordPos::Outside)
        })
    }
}

/// Approximate circle of `radius_km` around `center`, in degrees.
///
/// Uses the flat conversion of [`KM_PER_DEGREE`], so the shape is a circle
/// in degree space, not on the ground.
pub fn buffer_degrees(center: &GeoPoint, radius_km: f64) -> Polygon {
    circle_polygon(center, radius_km / KM_PER_DEGREE, DEFAULT_BUFFER_SEGMENTS)
}

/// Closed ring of `segments` vertices at `radius_deg` around `center`
pub fn circle_polygon(center: &GeoPoint, radius_deg: f64, segments: usize) -> Polygon {
    let segments = segments.max(3);
    let vertices = (0..segments)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / segments as f64;
            GeoPoint::new(center.lon + radius_deg * angle.cos(), center.lat + radius_deg * angle.sin())
        })
        .collect();
    Polygon::from_ring(Ring::closed(vertices))
}

fn mean_point<'a>(points: impl Iterator<Item = &'a GeoPoint>) -> Option<GeoPoint> {
    let (count, lon, lat) =
        points.fold((0usize, 0.0, 0.0), |(n, lon, lat), p| (n + 1, lon + p.lon, lat + p.lat));
    (count > 0).then(|| GeoPoint::new(lon / count as f64, lat / count as f64))
}

/// Arithmetic mean of the distinct exterior vertices.
///
/// The closing vertex is not counted twice. This is a vertex centroid, not
/// an area centroid; it only feeds the envelope sanity check.
pub fn polygon_centroid(polygon: &Polygon) -> Option<GeoPoint> {
    mean_point(polygon.exterior.open_vertices().iter())
}

/// Vertex centroid over the exterior rings of every part
pub fn region_centroid(region: &BoundaryRegion) -> Option<GeoPoint> {
    mean_point(region.exterior_vertices())
}
