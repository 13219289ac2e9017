//! Query engine over catalog snapshots.
//!
//! Spatial operations narrow candidates through the snapshot's R-tree, then
//! re-check every candidate with the exact predicate. Attribute operations
//! scan the whole snapshot. Both paths report progress to the query's
//! [`QueryControl`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use heritage_core::config::QueryLimits;
use heritage_core::error::{HeritageError, Result};
use heritage_core::models::{GeoPoint, HistoricalSite, Ring, SiteId};
use heritage_geo::spatial::{circle_polygon, haversine_distance_km, Containment};
use heritage_geo::validation::validate_query_ring;
use heritage_store::{CatalogSnapshot, CatalogStats, SpatialCatalog};
use tracing::debug;

use crate::control::QueryControl;
use crate::models::{
    BufferResponse, Coordinates, DateRange, NearbyResponse, PolygonResponse, RegionResponse,
    RegionSummary, SiteDetail, SiteFilter, SiteSummary, TimelineResponse,
};

/// Read-only query surface over a shared catalog
#[derive(Debug, Clone)]
pub struct QueryEngine {
    catalog: Arc<SpatialCatalog>,
    limits: QueryLimits,
    timeout: Option<Duration>,
}

impl QueryEngine {
    pub fn new(catalog: Arc<SpatialCatalog>) -> Self {
        Self { catalog, limits: QueryLimits::default(), timeout: None }
    }

    pub fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Deadline applied to every query started through [`QueryEngine::query`]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &Arc<SpatialCatalog> {
        &self.catalog
    }

    pub fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    /// Start a query using the engine's default timeout
    pub fn query(&self) -> Query<'_> {
        let control = match self.timeout {
            Some(timeout) => QueryControl::with_timeout(timeout),
            None => QueryControl::unbounded(),
        };
        self.controlled(control)
    }

    /// Start a query under an explicit deadline or cancellation flag
    pub fn controlled(&self, control: QueryControl) -> Query<'_> {
        Query { engine: self, control }
    }

    pub fn nearby(&self, center: GeoPoint, radius_km: f64) -> Result<NearbyResponse> {
        self.query().nearby(center, radius_km)
    }

    pub fn within_polygon(&self, ring: &Ring) -> Result<PolygonResponse> {
        self.query().within_polygon(ring)
    }

    pub fn within_buffer(&self, center: SiteId, buffer_km: f64) -> Result<BufferResponse> {
        self.query().within_buffer(center, buffer_km)
    }

    pub fn within_region(&self, name: &str) -> Result<RegionResponse> {
        self.query().within_region(name)
    }

    pub fn filter_sites(&self, filter: &SiteFilter) -> Result<Vec<SiteSummary>> {
        self.query().filter_sites(filter)
    }

    pub fn timeline(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<TimelineResponse> {
        self.query().timeline(start, end)
    }

    pub fn category_counts(&self) -> Result<BTreeMap<String, usize>> {
        self.query().category_counts()
    }

    pub fn site(&self, id: SiteId) -> Result<SiteDetail> {
        self.catalog.record(id).map(|site| SiteDetail::from(site.as_ref()))
    }

    /// Region summaries in name order
    pub fn regions(&self) -> Vec<RegionSummary> {
        self.catalog.snapshot().regions().map(|r| RegionSummary::from(r.as_ref())).collect()
    }

    pub fn stats(&self) -> CatalogStats {
        self.catalog.stats()
    }
}

/// One query execution bound to a [`QueryControl`]
#[derive(Debug)]
pub struct Query<'a> {
    engine: &'a QueryEngine,
    control: QueryControl,
}

impl Query<'_> {
    /// Sites within `radius_km` of `center`, nearest first.
    ///
    /// The boundary is inclusive. Equal distances are ordered by id.
    pub fn nearby(&self, center: GeoPoint, radius_km: f64) -> Result<NearbyResponse> {
        check_center(&center)?;
        check_radius("radius_km", radius_km, self.engine.limits.max_nearby_radius_km)?;

        let snapshot = self.engine.catalog.snapshot();
        let mut guard = self.control.scan()?;
        let mut hits = Vec::new();
        for site in snapshot.sites_near(&center, radius_km) {
            guard.tick()?;
            let distance = haversine_distance_km(&site.location, &center);
            if distance <= radius_km {
                hits.push((distance, site));
            }
        }
        hits.sort_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)));

        let sites: Vec<SiteSummary> = hits
            .into_iter()
            .map(|(distance, site)| SiteSummary::from(site.as_ref()).with_distance(distance))
            .collect();
        debug!(radius_km, center = %center, count = sites.len(), "nearby query");

        Ok(NearbyResponse { count: sites.len(), radius_km, center: center.into(), sites })
    }

    /// Sites inside a caller-drawn ring, in id order.
    ///
    /// The ring is `(lon, lat)` and may be open. Edge points count as inside.
    pub fn within_polygon(&self, ring: &Ring) -> Result<PolygonResponse> {
        let polygon = validate_query_ring(ring)?;
        let containment = Containment::polygon(&polygon);

        let snapshot = self.engine.catalog.snapshot();
        let sites = self.contained(&snapshot, &containment, None)?;
        debug!(vertices = ring.len(), count = sites.len(), "polygon query");

        Ok(PolygonResponse { count: sites.len(), sites: summaries(sites) })
    }

    /// Sites inside a degree buffer around another site.
    ///
    /// The center site itself is never part of the result. Order is event
    /// date, then id.
    pub fn within_buffer(&self, center: SiteId, buffer_km: f64) -> Result<BufferResponse> {
        let limits = &self.engine.limits;
        check_radius("buffer_km", buffer_km, limits.max_buffer_radius_km)?;

        let snapshot = self.engine.catalog.snapshot();
        let center_site =
            snapshot.site(center).ok_or_else(|| HeritageError::not_found("Site", center))?;

        let buffer = circle_polygon(
            &center_site.location,
            buffer_km / limits.km_per_degree,
            limits.buffer_segments,
        );
        let containment = Containment::polygon(&buffer);

        let mut sites = self.contained(&snapshot, &containment, Some(center))?;
        sites.sort_by(|a, b| a.chronological_cmp(b));
        debug!(center = %center_site.name, buffer_km, count = sites.len(), "buffer query");

        Ok(BufferResponse {
            count: sites.len(),
            center_site: center_site.name.clone(),
            center_location: Coordinates::from(center_site.location),
            buffer_km,
            sites: summaries(sites),
        })
    }

    /// Sites inside a named boundary region, in id order
    pub fn within_region(&self, name: &str) -> Result<RegionResponse> {
        let snapshot = self.engine.catalog.snapshot();
        let region =
            snapshot.region(name).ok_or_else(|| HeritageError::not_found("Region", name))?;

        let containment = Containment::region(region);
        let sites = self.contained(&snapshot, &containment, None)?;
        debug!(region = %region.name, count = sites.len(), "region query");

        Ok(RegionResponse { count: sites.len(), region: region.name.clone(), sites: summaries(sites) })
    }

    /// Attribute-filtered site list in natural order
    pub fn filter_sites(&self, filter: &SiteFilter) -> Result<Vec<SiteSummary>> {
        let snapshot = self.engine.catalog.snapshot();

        let county = match filter.county.as_deref() {
            Some(name) => match snapshot.region(name) {
                Some(region) => Some(Containment::region(region)),
                None => {
                    debug!(county = name, "unknown county in filter");
                    return Ok(Vec::new());
                }
            },
            None => None,
        };

        let mut guard = self.control.scan()?;
        let mut sites = Vec::new();
        for site in snapshot.sites() {
            guard.tick()?;
            if filter.matches_attributes(site)
                && county.as_ref().map_or(true, |c| c.contains(&site.location))
            {
                sites.push(site);
            }
        }
        sites.sort_by(|a, b| a.natural_cmp(b));

        Ok(summaries(sites))
    }

    /// Sites dated within the inclusive range, in natural order
    pub fn timeline(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<TimelineResponse> {
        let date_range = DateRange { start, end };
        let snapshot = self.engine.catalog.snapshot();

        let mut guard = self.control.scan()?;
        let mut sites = Vec::new();
        for site in snapshot.sites() {
            guard.tick()?;
            if date_range.contains(site.event_date) {
                sites.push(site);
            }
        }
        sites.sort_by(|a, b| a.natural_cmp(b));

        Ok(TimelineResponse { count: sites.len(), date_range, sites: summaries(sites) })
    }

    /// Site count per category label; absent categories are omitted
    pub fn category_counts(&self) -> Result<BTreeMap<String, usize>> {
        let snapshot = self.engine.catalog.snapshot();
        let mut guard = self.control.scan()?;
        let mut counts = BTreeMap::new();
        for site in snapshot.sites() {
            guard.tick()?;
            *counts.entry(site.category.label().to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn contained<'s>(
        &self,
        snapshot: &'s CatalogSnapshot,
        containment: &Containment,
        exclude: Option<SiteId>,
    ) -> Result<Vec<&'s Arc<HistoricalSite>>> {
        let Some(bbox) = containment.bounding_box() else {
            return Ok(Vec::new());
        };

        let mut guard = self.control.scan()?;
        let mut sites = Vec::new();
        for site in snapshot.sites_in_bbox(&bbox) {
            guard.tick()?;
            if Some(site.id) != exclude && containment.contains(&site.location) {
                sites.push(site);
            }
        }
        Ok(sites)
    }
}

fn summaries(sites: Vec<&Arc<HistoricalSite>>) -> Vec<SiteSummary> {
    sites.into_iter().map(|site| SiteSummary::from(site.as_ref())).collect()
}

fn check_center(center: &GeoPoint) -> Result<()> {
    if !(-90.0..=90.0).contains(&center.lat) {
        return Err(HeritageError::invalid_parameter(
            "latitude",
            format!("must be between -90 and 90, got {}", center.lat),
        ));
    }
    if !(-180.0..=180.0).contains(&center.lon) {
        return Err(HeritageError::invalid_parameter(
            "longitude",
            format!("must be between -180 and 180, got {}", center.lon),
        ));
    }
    Ok(())
}

fn check_radius(name: &str, value: f64, max: f64) -> Result<()> {
    if value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(HeritageError::invalid_parameter(
            name,
            format!("must be greater than 0 and at most {}, got {}", max, value),
        ))
    }
}
