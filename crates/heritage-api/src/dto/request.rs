use chrono::NaiveDate;
use heritage_core::error::{HeritageError, Result};
use heritage_core::models::{Category, GeoPoint, Ring, SiteId};
use heritage_query::SiteFilter;
use serde::Deserialize;

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| HeritageError::invalid_parameter(name, "is required"))
}

/// Site list filters
#[derive(Debug, Default, Deserialize)]
pub struct SiteListParams {
    pub category: Option<String>,
    pub event_type: Option<String>,
    pub event_date_from: Option<NaiveDate>,
    pub event_date_to: Option<NaiveDate>,
    pub county: Option<String>,
}

impl SiteListParams {
    /// Blank values are treated as absent
    pub fn into_filter(self) -> Result<SiteFilter> {
        let category = non_empty(self.category).map(|c| c.parse::<Category>()).transpose()?;
        Ok(SiteFilter {
            category,
            event_type: non_empty(self.event_type),
            event_date_from: self.event_date_from,
            event_date_to: self.event_date_to,
            county: non_empty(self.county),
        })
    }
}

/// Proximity search, as query string or JSON body
#[derive(Debug, Default, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<f64>,
    #[serde(alias = "lon")]
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
}

impl NearbyParams {
    pub fn center(&self) -> Result<GeoPoint> {
        Ok(GeoPoint::new(required(self.lng, "lng")?, required(self.lat, "lat")?))
    }
}

/// Polygon search body: a ring of `[lon, lat]` pairs
#[derive(Debug, Deserialize)]
pub struct PolygonRequest {
    pub polygon: Vec<[f64; 2]>,
}

impl PolygonRequest {
    pub fn ring(&self) -> Ring {
        Ring::from_coords(&self.polygon)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BufferParams {
    pub site_id: Option<u64>,
    pub buffer_km: Option<f64>,
}

impl BufferParams {
    pub fn site_id(&self) -> Result<SiteId> {
        required(self.site_id, "site_id").map(SiteId)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RegionParams {
    #[serde(alias = "region")]
    pub county: Option<String>,
}

impl RegionParams {
    pub fn county(self) -> Result<String> {
        required(non_empty(self.county), "county")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TimelineParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
