use heritage_core::config::ConfigSource;
use heritage_query::{RegionSummary, SiteSummary};
use heritage_store::{EnrichSummary, LoadSummary};
use serde::Serialize;
use tabled::Tabled;

/// Output for the load command
#[derive(Debug, Default, Serialize)]
pub struct LoadOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<LoadSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sites: Option<LoadSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichSummary>,
    pub total_sites: usize,
    pub total_regions: usize,
}

/// One site in a result table
#[derive(Debug, Tabled)]
pub struct SiteRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Distance (km)")]
    pub distance: String,
}

impl From<&SiteSummary> for SiteRow {
    fn from(site: &SiteSummary) -> Self {
        Self {
            id: site.id.0,
            name: site.name.clone(),
            date: site.event_date.to_string(),
            location: site.location_name.clone(),
            category: site.category.code().to_string(),
            distance: site.distance_km.map(|d| format!("{:.2}", d)).unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub fn site_rows(sites: &[SiteSummary]) -> Vec<SiteRow> {
    sites.iter().map(SiteRow::from).collect()
}

/// One county in the counties table
#[derive(Debug, Tabled)]
pub struct RegionRow {
    #[tabled(rename = "County")]
    pub name: String,
    #[tabled(rename = "Parts")]
    pub parts: usize,
    #[tabled(rename = "Centroid")]
    pub centroid: String,
}

impl From<&RegionSummary> for RegionRow {
    fn from(region: &RegionSummary) -> Self {
        Self {
            name: region.name.clone(),
            parts: region.parts,
            centroid: region
                .centroid
                .map(|c| format!("{:.4}, {:.4}", c.longitude, c.latitude))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "Category")]
    pub label: String,
    #[tabled(rename = "Sites")]
    pub count: usize,
}

/// One resolved configuration value
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl ConfigRow {
    pub fn new(key: String, value: String, source: ConfigSource) -> Self {
        Self { key, value, source: format!("{:?}", source) }
    }
}
