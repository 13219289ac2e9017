//! Batch loaders that feed the catalog.
//!
//! Every loader validates items one at a time. A bad item is skipped and
//! reported in the summary; the rest of the batch still goes in. Each file
//! is applied as a single catalog update, so readers never see half a file.

use crate::catalog::{CatalogWriter, SpatialCatalog, UpsertOutcome};
use chrono::NaiveDate;
use heritage_core::config::LayeredConfig;
use heritage_core::error::{HeritageError, Result};
use heritage_core::models::{BoundaryRegion, Category, Crs, GeoPoint, HistoricalSite};
use heritage_geo::models::polygons_from_geojson;
use heritage_geo::validation::IngestValidator;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Property keys tried, in order, for a boundary's name
const REGION_NAME_KEYS: [&str; 4] = ["COUNTY", "county", "NAME", "name"];

/// One skipped item and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub item: String,
    pub reason: String,
}

/// Aggregate outcome of a batch load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failures: Vec<LoadFailure>,
}

impl LoadSummary {
    pub fn total_processed(&self) -> usize {
        self.created + self.updated
    }

    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    fn skip(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        self.skipped += 1;
        self.failures.push(LoadFailure { item: item.into(), reason: reason.into() });
    }
}

/// Outcome of an enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichSummary {
    pub updated: usize,
    pub not_found: usize,
    pub failures: Vec<LoadFailure>,
}

/// A site as it appears in the source JSON file
#[derive(Debug, Deserialize)]
struct SiteEntry {
    event: String,
    date: String,
    location: String,
    latitude: f64,
    longitude: f64,
    significance: String,
    category: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    casualties: Option<u32>,
    #[serde(default)]
    commanders: Vec<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    audio_url: Option<String>,
    #[serde(default)]
    sources: Vec<String>,
}

/// Extra narrative content matched to an existing site by name
#[derive(Debug, Deserialize)]
struct EnrichEntry {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(HeritageError::FileNotFound { path: path.to_path_buf() });
    }
    Ok(fs::read_to_string(path)?)
}

fn parse_array(json: &str, what: &str) -> Result<Vec<JsonValue>> {
    match serde_json::from_str::<JsonValue>(json)? {
        JsonValue::Array(items) => Ok(items),
        _ => Err(HeritageError::Serialization(format!("{} file must contain a JSON array", what))),
    }
}

/// Label used in logs and summaries for an unparsed item
fn item_label(raw: &JsonValue, key: &str, idx: usize) -> String {
    raw.get(key)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("item {}", idx))
}

/// Runs the site, boundary and enrichment loaders against one catalog
#[derive(Debug)]
pub struct CatalogLoader<'a> {
    catalog: &'a SpatialCatalog,
    validator: IngestValidator,
    site_crs: Crs,
    boundary_crs: Crs,
}

impl<'a> CatalogLoader<'a> {
    /// Sites in WGS84, boundaries in Irish Transverse Mercator
    pub fn new(catalog: &'a SpatialCatalog) -> Self {
        Self {
            catalog,
            validator: IngestValidator::default(),
            site_crs: Crs::wgs84(),
            boundary_crs: Crs::irish_transverse_mercator(),
        }
    }

    /// Envelope and source datums taken from the resolved configuration
    pub fn from_config(catalog: &'a SpatialCatalog, config: &LayeredConfig) -> Self {
        Self::new(catalog)
            .with_validator(IngestValidator::new(config.envelope.value))
            .with_site_crs(Crs::from_epsg(config.site_crs.value))
            .with_boundary_crs(Crs::from_epsg(config.boundary_crs.value))
    }

    pub fn with_validator(mut self, validator: IngestValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_site_crs(mut self, crs: Crs) -> Self {
        self.site_crs = crs;
        self
    }

    pub fn with_boundary_crs(mut self, crs: Crs) -> Self {
        self.boundary_crs = crs;
        self
    }

    pub fn load_sites_file(&self, path: &Path) -> Result<LoadSummary> {
        tracing::info!(path = %path.display(), "Loading historical sites");
        self.load_sites_json(&read_source(path)?)
    }

    /// Load a JSON array of site entries.
    ///
    /// Entries are keyed by name: a known name replaces the stored record
    /// under its existing identifier, a new name gets the next identifier.
    /// `latitude`/`longitude` are read as y/x in the configured site CRS.
    pub fn load_sites_json(&self, json: &str) -> Result<LoadSummary> {
        let items = parse_array(json, "sites")?;

        let summary = self.catalog.update(|writer| {
            let mut summary = LoadSummary::default();
            for (idx, raw) in items.into_iter().enumerate() {
                let label = item_label(&raw, "event", idx);
                match self.admit_site(writer, raw) {
                    Ok((name, UpsertOutcome::Created)) => {
                        tracing::info!(site = %name, "Created");
                        summary.record(UpsertOutcome::Created);
                    }
                    Ok((name, UpsertOutcome::Updated)) => {
                        tracing::info!(site = %name, "Updated");
                        summary.record(UpsertOutcome::Updated);
                    }
                    Err(e) => {
                        tracing::warn!(site = %label, error = %e, "Skipped site");
                        summary.skip(label, e.to_string());
                    }
                }
            }
            Ok(summary)
        })?;

        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            total = self.catalog.stats().total_sites,
            "Site loading complete"
        );
        Ok(summary)
    }

    fn admit_site(&self, writer: &mut CatalogWriter, raw: JsonValue) -> Result<(String, UpsertOutcome)> {
        let entry: SiteEntry = serde_json::from_value(raw)?;

        let name = entry.event.trim();
        if name.is_empty() {
            return Err(HeritageError::invalid_parameter("event", "site name must not be empty"));
        }

        let event_date = NaiveDate::parse_from_str(entry.date.trim(), "%Y-%m-%d").map_err(|e| {
            HeritageError::invalid_parameter("date", format!("'{}' is not YYYY-MM-DD: {}", entry.date, e))
        })?;

        let raw_point = GeoPoint::new(entry.longitude, entry.latitude);
        let location = self.validator.admit_site_location(name, &raw_point, &self.site_crs)?;

        // Fields the entry does not carry survive a reload.
        let mut site = match writer.view().site_by_name(name) {
            Some(existing) => HistoricalSite { event_date, location, ..(**existing).clone() },
            None => HistoricalSite::new(writer.next_site_id(), name, event_date, location),
        };

        site.location_name = entry.location;
        site.significance = entry.significance;
        site.category = Category::from_source_label(&entry.category).unwrap_or_default();
        site.event_type = entry.event_type;
        if entry.description.is_some() {
            site.description = entry.description;
        }
        if entry.casualties.is_some() {
            site.casualties = entry.casualties;
        }
        if !entry.commanders.is_empty() {
            site.commanders = entry.commanders;
        }
        if !entry.images.is_empty() {
            site.images = entry.images;
        }
        if entry.audio_url.is_some() {
            site.audio_url = entry.audio_url;
        }
        if !entry.sources.is_empty() {
            site.sources = entry.sources;
        }

        let name = site.name.clone();
        Ok((name, writer.upsert_site(site)?))
    }

    pub fn load_boundaries_file(&self, path: &Path) -> Result<LoadSummary> {
        tracing::info!(path = %path.display(), crs = %self.boundary_crs, "Loading boundaries");
        self.load_boundaries_json(&read_source(path)?)
    }

    /// Load a GeoJSON FeatureCollection of boundary polygons.
    ///
    /// Geometry is always read as the configured boundary CRS; a `crs`
    /// member in the file is ignored.
    pub fn load_boundaries_json(&self, json: &str) -> Result<LoadSummary> {
        let document: JsonValue = serde_json::from_str(json)?;
        if document.get("crs").is_some() {
            tracing::debug!(using = %self.boundary_crs, "Ignoring crs member embedded in GeoJSON");
        }
        let features = document
            .get("features")
            .and_then(JsonValue::as_array)
            .cloned()
            .ok_or_else(|| {
                HeritageError::Serialization("boundary file must be a FeatureCollection".to_string())
            })?;
        tracing::info!(count = features.len(), "Found features");

        let summary = self.catalog.update(|writer| {
            let mut summary = LoadSummary::default();
            let mut seen = HashSet::new();

            for (idx, raw) in features.into_iter().enumerate() {
                let feature = match geojson::Feature::from_json_value(raw) {
                    Ok(feature) => feature,
                    Err(e) => {
                        tracing::warn!(feature = idx, error = %e, "Unreadable feature");
                        summary.skip(format!("feature {}", idx), e.to_string());
                        continue;
                    }
                };

                let Some(geometry) = feature.geometry.as_ref() else {
                    summary.skip(format!("feature {}", idx), "feature has no geometry");
                    continue;
                };

                let Some(raw_name) = REGION_NAME_KEYS
                    .iter()
                    .filter_map(|key| feature.property(key).and_then(JsonValue::as_str))
                    .find(|name| !name.trim().is_empty())
                else {
                    summary.skip(format!("feature {}", idx), "feature has no name property");
                    continue;
                };

                let name = BoundaryRegion::normalize_name(raw_name);
                if !seen.insert(name.clone()) {
                    tracing::warn!(region = %name, "Duplicate in file");
                    summary.skip(name, "duplicate name in file");
                    continue;
                }

                let admitted = polygons_from_geojson(&geometry.value, &name).and_then(|parts| {
                    self.validator.admit_boundary(&name, &parts, &self.boundary_crs)
                });

                match admitted {
                    Ok(region) => {
                        let centroid = heritage_geo::spatial::region_centroid(&region);
                        let outcome = writer.upsert_region(region);
                        tracing::info!(region = %name, ?outcome, centroid = ?centroid, "Admitted boundary");
                        summary.record(outcome);
                    }
                    Err(e) => {
                        tracing::warn!(region = %name, error = %e, "Skipped boundary");
                        summary.skip(name, e.to_string());
                    }
                }
            }
            Ok(summary)
        })?;

        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            "Boundary loading complete"
        );
        Ok(summary)
    }

    pub fn enrich_sites_file(&self, path: &Path) -> Result<EnrichSummary> {
        tracing::info!(path = %path.display(), "Enriching sites");
        self.enrich_sites_json(&read_source(path)?)
    }

    /// Replace descriptions and images of existing sites, matched by name
    /// regardless of case. Empty values leave the stored ones alone.
    pub fn enrich_sites_json(&self, json: &str) -> Result<EnrichSummary> {
        let items = parse_array(json, "enrichment")?;

        let summary = self.catalog.update(|writer| {
            let mut summary = EnrichSummary::default();
            for (idx, raw) in items.into_iter().enumerate() {
                let label = item_label(&raw, "name", idx);
                let entry: EnrichEntry = match serde_json::from_value(raw) {
                    Ok(entry) => entry,
                    Err(e) => {
                        summary.failures.push(LoadFailure { item: label, reason: e.to_string() });
                        continue;
                    }
                };

                let Some(existing) = writer.view().site_by_name_ignore_case(&entry.name) else {
                    tracing::warn!(site = %entry.name, "Site not found");
                    summary.not_found += 1;
                    continue;
                };

                let mut site = (**existing).clone();
                if let Some(description) = entry.description.filter(|d| !d.trim().is_empty()) {
                    site.description = Some(description);
                }
                if !entry.images.is_empty() {
                    site.images = entry.images;
                }

                let name = site.name.clone();
                match writer.upsert_site(site) {
                    Ok(_) => {
                        tracing::info!(site = %name, "Updated");
                        summary.updated += 1;
                    }
                    Err(e) => summary.failures.push(LoadFailure { item: name, reason: e.to_string() }),
                }
            }
            Ok(summary)
        })?;

        tracing::info!(updated = summary.updated, not_found = summary.not_found, "Update complete");
        Ok(summary)
    }
}
