//! R-tree over site locations.
//!
//! The index only produces candidates. Every query re-checks candidates with
//! the exact predicate, so results match an exhaustive scan as long as the
//! candidate window never excludes a true match.

use heritage_core::models::{BoundingBox, GeoPoint, SiteId};
use rstar::{RTree, RTreeObject, AABB};

/// Sphere radius used by the Haversine distance, in kilometres
const MEAN_EARTH_RADIUS_KM: f64 = 6371.0088;

/// Relative slack added to search windows to absorb rounding
const WINDOW_PADDING: f64 = 1e-6;

/// Indexed site position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedSite {
    pub id: SiteId,
    pub location: [f64; 2],
}

impl RTreeObject for IndexedSite {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.location)
    }
}

/// Spatial index for site candidate lookup
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    tree: RTree<IndexedSite>,
}

impl SiteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index in one pass
    pub fn bulk_load(sites: impl IntoIterator<Item = (SiteId, GeoPoint)>) -> Self {
        let entries = sites
            .into_iter()
            .map(|(id, location)| IndexedSite { id, location: location.as_array() })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn insert(&mut self, id: SiteId, location: GeoPoint) {
        self.tree.insert(IndexedSite { id, location: location.as_array() });
    }

    /// Remove the entry for `id` stored at `location`
    pub fn remove(&mut self, id: SiteId, location: GeoPoint) -> bool {
        self.tree.remove(&IndexedSite { id, location: location.as_array() }).is_some()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Ids of sites inside the box, edges included
    pub fn candidates_in_bbox(&self, bbox: &BoundingBox) -> Vec<SiteId> {
        let envelope =
            AABB::from_corners([bbox.min_lon, bbox.min_lat], [bbox.max_lon, bbox.max_lat]);
        self.tree.locate_in_envelope(&envelope).map(|entry| entry.id).collect()
    }

    /// Ids of sites that may lie within `radius_km` of `center`
    pub fn candidates_near(&self, center: &GeoPoint, radius_km: f64) -> Vec<SiteId> {
        self.candidates_in_bbox(&search_window(center, radius_km))
    }
}

/// Conservative lat/lon box around a great-circle disc.
///
/// Uses the bounding-coordinates construction on the mean sphere. Near the
/// poles, or when the disc crosses the antimeridian, the box spans every
/// longitude.
pub fn search_window(center: &GeoPoint, radius_km: f64) -> BoundingBox {
    let angular = (radius_km / MEAN_EARTH_RADIUS_KM) * (1.0 + WINDOW_PADDING) + 1e-12;
    let angular_deg = angular.to_degrees();

    let min_lat = (center.lat - angular_deg).max(-90.0);
    let max_lat = (center.lat + angular_deg).min(90.0);
    let full_width = BoundingBox::new(-180.0, min_lat, 180.0, max_lat);

    if min_lat <= -90.0 || max_lat >= 90.0 {
        return full_width;
    }

    let ratio = angular.sin() / center.lat.to_radians().cos();
    if ratio >= 1.0 {
        return full_width;
    }

    let delta_lon = ratio.asin().to_degrees();
    let min_lon = center.lon - delta_lon;
    let max_lon = center.lon + delta_lon;

    if min_lon < -180.0 || max_lon > 180.0 {
        full_width
    } else {
        BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
    }
}
