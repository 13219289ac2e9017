use serde::{Deserialize, Serialize};

use super::geometry::{BoundingBox, GeoPoint, Polygon};

/// A named administrative boundary (e.g. a county) in WGS84.
///
/// Names are stored trimmed and upper-cased so that lookups are
/// case-insensitive. A region may consist of several polygon parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRegion {
    pub name: String,
    pub parts: Vec<Polygon>,
}

impl BoundaryRegion {
    pub fn new(name: &str, parts: Vec<Polygon>) -> Self {
        Self { name: Self::normalize_name(name), parts }
    }

    /// Region made of a single polygon
    pub fn single(name: &str, polygon: Polygon) -> Self {
        Self::new(name, vec![polygon])
    }

    /// Canonical key for a region name
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_uppercase()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name == Self::normalize_name(name)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.parts
            .iter()
            .filter_map(Polygon::bounding_box)
            .reduce(|acc, bbox| acc.merge(&bbox))
    }

    /// All exterior vertices of all parts, closing vertices excluded
    pub fn exterior_vertices(&self) -> impl Iterator<Item = &GeoPoint> {
        self.parts.iter().flat_map(|p| p.exterior.open_vertices().iter())
    }
}
