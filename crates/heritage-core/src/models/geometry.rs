//! Canonical geometry types used across all heritage crates.
//!
//! Coordinates are always `(longitude, latitude)` pairs. Once a geometry has
//! been admitted to the catalog it is in WGS84; projected coordinates only
//! exist transiently, between a loader and the transformer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Coordinate Reference System identified by EPSG code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self { epsg, name: name.into() }
    }

    /// WGS 84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// IRENET95 / Irish Transverse Mercator (EPSG:2157)
    pub fn irish_transverse_mercator() -> Self {
        Self::new(2157, "IRENET95 / Irish Transverse Mercator")
    }

    /// Build a CRS from a bare EPSG code, naming the ones we know
    pub fn from_epsg(epsg: u32) -> Self {
        match epsg {
            4326 => Self::wgs84(),
            2157 => Self::irish_transverse_mercator(),
            other => Self::new(other, format!("EPSG:{}", other)),
        }
    }

    /// Whether coordinates in this CRS are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        self.epsg == 4326
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// A single position: `lon` is x, `lat` is y
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Longitude in [-180, 180] and latitude in [-90, 90]
    pub fn in_wgs84_range(&self) -> bool {
        (-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords[0], coords[1])
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        point.as_array()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lon, self.lat)
    }
}

/// Ordered ring of vertices. Serialized as a GeoJSON coordinate array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Ring(Vec<GeoPoint>);

impl Ring {
    /// Wrap vertices as given, without closing the ring
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        Self(vertices)
    }

    /// Wrap vertices, appending the first vertex when the ring is open
    pub fn closed(mut vertices: Vec<GeoPoint>) -> Self {
        if let (Some(first), Some(last)) = (vertices.first().copied(), vertices.last()) {
            if first != *last {
                vertices.push(first);
            }
        }
        Self(vertices)
    }

    pub fn from_coords(coords: &[[f64; 2]]) -> Self {
        Self(coords.iter().copied().map(GeoPoint::from).collect())
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First vertex equals last vertex
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => self.0.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Vertices without the closing duplicate
    pub fn open_vertices(&self) -> &[GeoPoint] {
        if self.is_closed() {
            &self.0[..self.0.len() - 1]
        } else {
            &self.0
        }
    }

    /// Number of distinct positions in the ring
    pub fn distinct_vertex_count(&self) -> usize {
        // `+ 0.0` folds -0.0 into 0.0 so both hash alike.
        self.0
            .iter()
            .map(|p| ((p.lon + 0.0).to_bits(), (p.lat + 0.0).to_bits()))
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.0.iter().copied())
    }

    pub fn coords(&self) -> Vec<[f64; 2]> {
        self.0.iter().map(GeoPoint::as_array).collect()
    }
}

impl From<Vec<[f64; 2]>> for Ring {
    fn from(coords: Vec<[f64; 2]>) -> Self {
        Self(coords.into_iter().map(GeoPoint::from).collect())
    }
}

impl From<Ring> for Vec<[f64; 2]> {
    fn from(ring: Ring) -> Self {
        ring.coords()
    }
}

/// Polygon with one exterior ring and zero or more holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Ring,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Polygon made of a single ring, as a caller draws it
    pub fn from_ring(exterior: Ring) -> Self {
        Self { exterior, holes: Vec::new() }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.exterior.bounding_box()
    }

    /// GeoJSON-style coordinate rings, exterior first
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }
}

/// Axis-aligned bounding box in degrees (inclusive on all sides)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    pub fn from_points(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first.lon, first.lat, first.lon, first.lat);
        for p in iter {
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
        }
        Some(bbox)
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lon >= self.min_lon
            && point.lon <= self.max_lon
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }

    /// Union of two boxes
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_lon.min(other.min_lon),
            self.min_lat.min(other.min_lat),
            self.max_lon.max(other.max_lon),
            self.max_lat.max(other.max_lat),
        )
    }
}

/// Geographic sanity envelope for admitted boundaries.
///
/// Bounds are exclusive: a centroid sitting exactly on an edge is rejected.
/// The default covers the island of Ireland.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicEnvelope {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Default for GeographicEnvelope {
    fn default() -> Self {
        Self::ireland()
    }
}

impl GeographicEnvelope {
    pub fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self { min_lon, max_lon, min_lat, max_lat }
    }

    pub fn ireland() -> Self {
        Self::new(-11.0, -5.0, 51.0, 56.0)
    }

    /// The whole globe; effectively disables the check
    pub fn unbounded() -> Self {
        Self::new(-180.0, 180.0, -90.0, 90.0)
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.min_lon < point.lon
            && point.lon < self.max_lon
            && self.min_lat < point.lat
            && point.lat < self.max_lat
    }

    pub fn is_well_formed(&self) -> bool {
        self.min_lon < self.max_lon && self.min_lat < self.max_lat
    }
}

impl fmt::Display for GeographicEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lon ({}, {}), lat ({}, {})",
            self.min_lon, self.max_lon, self.min_lat, self.max_lat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        Ring::from_coords(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]])
    }

    #[test]
    fn test_ring_serializes_as_coordinate_array() {
        let json = serde_json::to_string(&square()).unwrap();
        assert_eq!(json, "[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]");

        let parsed: Ring = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, square());
    }

    #[test]
    fn test_ring_closing() {
        let open = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0), GeoPoint::new(1.0, 1.0)];
        let ring = Ring::closed(open);
        assert!(ring.is_closed());
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.open_vertices().len(), 3);

        // Already closed rings are left alone
        assert_eq!(Ring::closed(square().vertices().to_vec()).len(), 5);
    }

    #[test]
    fn test_distinct_vertex_count() {
        assert_eq!(square().distinct_vertex_count(), 4);

        let degenerate = Ring::from_coords(&[[0.0, 0.0], [1.0, 1.0], [-0.0, 0.0], [1.0, 1.0]]);
        assert_eq!(degenerate.distinct_vertex_count(), 2);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = square().bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert!(bbox.contains(&GeoPoint::new(1.0, 0.5)));
        assert!(!bbox.contains(&GeoPoint::new(1.01, 0.5)));
        assert!(Ring::new(vec![]).bounding_box().is_none());
    }

    #[test]
    fn test_envelope_is_exclusive() {
        let envelope = GeographicEnvelope::ireland();
        assert!(envelope.contains(&GeoPoint::new(-6.26, 53.35)));
        assert!(!envelope.contains(&GeoPoint::new(-11.0, 53.0)));
        assert!(!envelope.contains(&GeoPoint::new(-2.0, 53.0)));
        assert!(!envelope.contains(&GeoPoint::new(-8.0, 56.0)));
    }

    #[test]
    fn test_wgs84_range() {
        assert!(GeoPoint::new(180.0, -90.0).in_wgs84_range());
        assert!(!GeoPoint::new(200.0, 0.0).in_wgs84_range());
        assert!(!GeoPoint::new(0.0, 95.0).in_wgs84_range());
        assert!(!GeoPoint::new(f64::NAN, 0.0).in_wgs84_range());
    }

    #[test]
    fn test_crs_from_epsg() {
        assert_eq!(Crs::from_epsg(4326), Crs::wgs84());
        assert_eq!(Crs::from_epsg(2157).to_string(), "EPSG:2157");
        assert!(!Crs::irish_transverse_mercator().is_geographic());
        assert_eq!(Crs::from_epsg(3857).name, "EPSG:3857");
    }
}
