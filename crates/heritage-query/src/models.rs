use chrono::NaiveDate;
use heritage_core::models::{BoundaryRegion, BoundingBox, Category, GeoPoint, HistoricalSite, SiteId};
use heritage_geo::spatial::region_centroid;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair as returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoPoint> for Coordinates {
    fn from(point: GeoPoint) -> Self {
        Self { latitude: point.lat, longitude: point.lon }
    }
}

/// Compact site record used in every list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub id: SiteId,
    pub name: String,
    pub event_date: NaiveDate,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
    pub event_type: String,

    /// Great-circle distance from the query center, proximity search only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl SiteSummary {
    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }
}

impl From<&HistoricalSite> for SiteSummary {
    fn from(site: &HistoricalSite) -> Self {
        Self {
            id: site.id,
            name: site.name.clone(),
            event_date: site.event_date,
            location_name: site.location_name.clone(),
            latitude: site.latitude(),
            longitude: site.longitude(),
            category: site.category,
            event_type: site.event_type.clone(),
            distance_km: None,
        }
    }
}

/// Full site record for detail views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDetail {
    pub id: SiteId,
    pub name: String,
    pub event_date: NaiveDate,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
    pub category_display: String,
    pub event_type: String,
    pub significance: String,
    pub description: Option<String>,
    pub casualties: Option<u32>,
    pub commanders: Vec<String>,
    pub images: Vec<String>,
    pub audio_url: Option<String>,
    pub sources: Vec<String>,
}

impl From<&HistoricalSite> for SiteDetail {
    fn from(site: &HistoricalSite) -> Self {
        Self {
            id: site.id,
            name: site.name.clone(),
            event_date: site.event_date,
            location_name: site.location_name.clone(),
            latitude: site.latitude(),
            longitude: site.longitude(),
            category: site.category,
            category_display: site.category.label().to_string(),
            event_type: site.event_type.clone(),
            significance: site.significance.clone(),
            description: site.description.clone(),
            casualties: site.casualties,
            commanders: site.commanders.clone(),
            images: site.images.clone(),
            audio_url: site.audio_url.clone(),
            sources: site.sources.clone(),
        }
    }
}

/// Boundary region without its geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub name: String,
    pub parts: usize,
    pub centroid: Option<Coordinates>,
    pub bbox: Option<BoundingBox>,
}

impl From<&BoundaryRegion> for RegionSummary {
    fn from(region: &BoundaryRegion) -> Self {
        Self {
            name: region.name.clone(),
            parts: region.parts.len(),
            centroid: region_centroid(region).map(Coordinates::from),
            bbox: region.bounding_box(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub count: usize,
    pub radius_km: f64,
    pub center: Coordinates,
    pub sites: Vec<SiteSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonResponse {
    pub count: usize,
    pub sites: Vec<SiteSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferResponse {
    pub count: usize,
    pub center_site: String,
    pub center_location: Coordinates,
    pub buffer_km: f64,
    pub sites: Vec<SiteSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionResponse {
    pub count: usize,
    pub region: String,
    pub sites: Vec<SiteSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Inclusive on both ends; a missing bound is open
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineResponse {
    pub count: usize,
    pub date_range: DateRange,
    pub sites: Vec<SiteSummary>,
}

/// Attribute filters for the site list.
///
/// All set fields must match. `county` restricts to sites inside the named
/// boundary region; an unknown county matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteFilter {
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub event_date_from: Option<NaiveDate>,
    #[serde(default)]
    pub event_date_to: Option<NaiveDate>,
    #[serde(default)]
    pub county: Option<String>,
}

impl SiteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.event_date_from = from;
        self.event_date_to = to;
        self
    }

    pub fn county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    /// Attribute checks only; the county is resolved by the engine
    pub fn matches_attributes(&self, site: &HistoricalSite) -> bool {
        let dates = DateRange { start: self.event_date_from, end: self.event_date_to };
        self.category.map_or(true, |c| site.category == c)
            && self.event_type.as_deref().map_or(true, |t| site.event_type == t)
            && dates.contains(site.event_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = DateRange { start: Some(date(1922, 6, 28)), end: Some(date(1923, 5, 24)) };
        assert!(range.contains(date(1922, 6, 28)));
        assert!(range.contains(date(1923, 5, 24)));
        assert!(!range.contains(date(1921, 12, 6)));
        assert!(DateRange::default().contains(date(1916, 4, 24)));
    }

    #[test]
    fn test_filter_attributes() {
        let site = HistoricalSite::new(SiteId(1), "Ambush", date(1921, 3, 19), GeoPoint::new(-9.0, 51.8))
            .with_category(Category::WarIndependence)
            .with_event_type("Ambush");

        assert!(SiteFilter::new().matches_attributes(&site));
        assert!(SiteFilter::new().category(Category::WarIndependence).matches_attributes(&site));
        assert!(!SiteFilter::new().category(Category::CivilWar).matches_attributes(&site));
        assert!(!SiteFilter::new().event_type("Battle").matches_attributes(&site));
        assert!(SiteFilter::new()
            .between(Some(date(1921, 1, 1)), None)
            .matches_attributes(&site));
    }

    #[test]
    fn test_summary_omits_missing_distance() {
        let site = HistoricalSite::new(SiteId(1), "GPO", date(1916, 4, 24), GeoPoint::new(-6.2603, 53.3498));
        let json = serde_json::to_value(SiteSummary::from(&site)).unwrap();
        assert!(json.get("distance_km").is_none());
        assert_eq!(json["latitude"], 53.3498);
        assert_eq!(json["category"], "CIVIL_WAR");
    }
}
