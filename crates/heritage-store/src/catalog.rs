//! The spatial catalog: located sites plus named boundary regions.
//!
//! Readers clone an `Arc` to the current [`CatalogSnapshot`] and work on it
//! without holding any lock. Writers are serialized by a mutex, build a new
//! snapshot from a copy of the current one, and publish it with a single
//! pointer swap. A reader therefore sees either the whole batch or none of it.

use crate::index::SiteIndex;
use heritage_core::error::{HeritageError, Result};
use heritage_core::models::{BoundaryRegion, BoundingBox, GeoPoint, HistoricalSite, SiteId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Whether an upsert added a new entry or replaced one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Catalog size summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_sites: usize,
    pub total_regions: usize,
    pub version: u64,
}

/// Immutable view of the catalog at one point in time
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    sites: BTreeMap<SiteId, Arc<HistoricalSite>>,
    regions: BTreeMap<String, Arc<BoundaryRegion>>,
    index: SiteIndex,
    version: u64,
}

impl CatalogSnapshot {
    /// Sites in identifier order
    pub fn sites(&self) -> impl Iterator<Item = &Arc<HistoricalSite>> {
        self.sites.values()
    }

    pub fn site(&self, id: SiteId) -> Option<&Arc<HistoricalSite>> {
        self.sites.get(&id)
    }

    /// Exact-name lookup
    pub fn site_by_name(&self, name: &str) -> Option<&Arc<HistoricalSite>> {
        self.sites.values().find(|s| s.name == name)
    }

    /// Case-insensitive name lookup
    pub fn site_by_name_ignore_case(&self, name: &str) -> Option<&Arc<HistoricalSite>> {
        let wanted = name.trim().to_lowercase();
        self.sites.values().find(|s| s.name.to_lowercase() == wanted)
    }

    /// Regions in name order
    pub fn regions(&self) -> impl Iterator<Item = &Arc<BoundaryRegion>> {
        self.regions.values()
    }

    /// Case-insensitive exact name match
    pub fn region(&self, name: &str) -> Option<&Arc<BoundaryRegion>> {
        self.regions.get(&BoundaryRegion::normalize_name(name))
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Incremented on every published write
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn index(&self) -> &SiteIndex {
        &self.index
    }

    /// Sites whose location falls inside the box, in identifier order
    pub fn sites_in_bbox(&self, bbox: &BoundingBox) -> Vec<&Arc<HistoricalSite>> {
        self.resolve(self.index.candidates_in_bbox(bbox))
    }

    /// Sites that may lie within `radius_km` of `center`, in identifier order
    pub fn sites_near(&self, center: &GeoPoint, radius_km: f64) -> Vec<&Arc<HistoricalSite>> {
        self.resolve(self.index.candidates_near(center, radius_km))
    }

    fn resolve(&self, mut ids: Vec<SiteId>) -> Vec<&Arc<HistoricalSite>> {
        ids.sort_unstable();
        ids.into_iter().filter_map(|id| self.sites.get(&id)).collect()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_sites: self.sites.len(),
            total_regions: self.regions.len(),
            version: self.version,
        }
    }
}

/// Mutable draft of the next snapshot, handed to [`SpatialCatalog::update`]
#[derive(Debug)]
pub struct CatalogWriter {
    draft: CatalogSnapshot,
}

impl CatalogWriter {
    /// Current state of the draft, including earlier writes in this batch
    pub fn view(&self) -> &CatalogSnapshot {
        &self.draft
    }

    /// Identifier one past the largest in use
    pub fn next_site_id(&self) -> SiteId {
        SiteId(self.draft.sites.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    /// Insert or wholesale replace a site keyed by its identifier.
    ///
    /// Names are unique: a different site already holding the name is an
    /// error.
    pub fn upsert_site(&mut self, site: HistoricalSite) -> Result<UpsertOutcome> {
        if !site.location.in_wgs84_range() {
            return Err(HeritageError::invalid_parameter(
                "location",
                format!("{} for '{}' is outside the WGS84 range", site.location, site.name),
            ));
        }
        if let Some(holder) = self.draft.site_by_name(&site.name) {
            if holder.id != site.id {
                return Err(HeritageError::invalid_parameter(
                    "name",
                    format!("'{}' is already used by site {}", site.name, holder.id),
                ));
            }
        }

        let id = site.id;
        let location = site.location;
        let outcome = match self.draft.sites.insert(id, Arc::new(site)) {
            Some(previous) => {
                self.draft.index.remove(id, previous.location);
                UpsertOutcome::Updated
            }
            None => UpsertOutcome::Created,
        };
        self.draft.index.insert(id, location);
        Ok(outcome)
    }

    /// Insert or wholesale replace a region keyed by its normalized name
    pub fn upsert_region(&mut self, region: BoundaryRegion) -> UpsertOutcome {
        match self.draft.regions.insert(region.name.clone(), Arc::new(region)) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Created,
        }
    }

    /// Drop every site and region
    pub fn clear(&mut self) {
        self.draft.sites.clear();
        self.draft.regions.clear();
        self.draft.index = SiteIndex::new();
    }
}

/// Thread-safe owner of the current snapshot
#[derive(Debug, Default)]
pub struct SpatialCatalog {
    current: RwLock<Arc<CatalogSnapshot>>,
    writer: Mutex<()>,
}

impl SpatialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already validated sites and regions
    pub fn from_parts(
        sites: impl IntoIterator<Item = HistoricalSite>,
        regions: impl IntoIterator<Item = BoundaryRegion>,
    ) -> Result<Self> {
        let catalog = Self::new();
        catalog.replace_all(sites, regions)?;
        Ok(catalog)
    }

    /// The current snapshot; stays valid however the catalog changes later
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Apply a batch of writes atomically.
    ///
    /// If `apply` returns an error nothing is published.
    pub fn update<T>(&self, apply: impl FnOnce(&mut CatalogWriter) -> Result<T>) -> Result<T> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut writer = CatalogWriter { draft: (*self.snapshot()).clone() };
        let value = apply(&mut writer)?;

        writer.draft.version += 1;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(writer.draft);
        Ok(value)
    }

    pub fn upsert_record(&self, site: HistoricalSite) -> Result<UpsertOutcome> {
        self.update(|writer| writer.upsert_site(site))
    }

    pub fn upsert_region(&self, region: BoundaryRegion) -> Result<UpsertOutcome> {
        self.update(|writer| Ok(writer.upsert_region(region)))
    }

    /// Replace the whole contents in one swap
    pub fn replace_all(
        &self,
        sites: impl IntoIterator<Item = HistoricalSite>,
        regions: impl IntoIterator<Item = BoundaryRegion>,
    ) -> Result<()> {
        self.update(|writer| {
            writer.clear();
            for site in sites {
                writer.upsert_site(site)?;
            }
            for region in regions {
                writer.upsert_region(region);
            }
            Ok(())
        })
    }

    /// All sites in identifier order
    pub fn all_records(&self) -> Vec<Arc<HistoricalSite>> {
        self.snapshot().sites().cloned().collect()
    }

    pub fn record(&self, id: SiteId) -> Result<Arc<HistoricalSite>> {
        self.snapshot().site(id).cloned().ok_or_else(|| HeritageError::not_found("Site", id))
    }

    pub fn region_by_name(&self, name: &str) -> Result<Arc<BoundaryRegion>> {
        self.snapshot()
            .region(name)
            .cloned()
            .ok_or_else(|| HeritageError::not_found("Region", name))
    }

    pub fn stats(&self) -> CatalogStats {
        self.snapshot().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use heritage_core::models::{Polygon, Ring};

    fn site(id: u64, name: &str, lon: f64, lat: f64) -> HistoricalSite {
        HistoricalSite::new(
            SiteId(id),
            name,
            NaiveDate::from_ymd_opt(1922, 6, 28).unwrap(),
            GeoPoint::new(lon, lat),
        )
    }

    fn region(name: &str) -> BoundaryRegion {
        BoundaryRegion::single(
            name,
            Polygon::from_ring(Ring::from_coords(&[
                [-6.3, 53.3],
                [-6.2, 53.3],
                [-6.2, 53.4],
                [-6.3, 53.4],
                [-6.3, 53.3],
            ])),
        )
    }

    #[test]
    fn test_upsert_created_then_updated() {
        let catalog = SpatialCatalog::new();
        assert_eq!(catalog.upsert_record(site(1, "Four Courts", -6.27, 53.35)).unwrap(), UpsertOutcome::Created);
        assert_eq!(catalog.upsert_record(site(1, "Four Courts", -6.28, 53.35)).unwrap(), UpsertOutcome::Updated);

        let stored = catalog.record(SiteId(1)).unwrap();
        assert_eq!(stored.location, GeoPoint::new(-6.28, 53.35));
        assert_eq!(catalog.snapshot().index().len(), 1);
    }

    #[test]
    fn test_name_uniqueness() {
        let catalog = SpatialCatalog::new();
        catalog.upsert_record(site(1, "Béal na Bláth", -8.9, 51.8)).unwrap();
        let err = catalog.upsert_record(site(2, "Béal na Bláth", -8.9, 51.8)).unwrap_err();
        assert!(matches!(err, HeritageError::InvalidParameter { .. }));
        assert_eq!(catalog.stats().total_sites, 1);
    }

    #[test]
    fn test_region_lookup_is_case_insensitive() {
        let catalog = SpatialCatalog::new();
        assert_eq!(catalog.upsert_region(region("Dublin")).unwrap(), UpsertOutcome::Created);
        assert_eq!(catalog.upsert_region(region("DUBLIN")).unwrap(), UpsertOutcome::Updated);

        assert!(catalog.region_by_name("dublin").is_ok());
        assert!(catalog.region_by_name(" Dublin ").is_ok());
        assert!(matches!(catalog.region_by_name("Cork"), Err(HeritageError::NotFound { .. })));
    }

    #[test]
    fn test_missing_record() {
        let catalog = SpatialCatalog::new();
        assert!(matches!(catalog.record(SiteId(9)), Err(HeritageError::NotFound { .. })));
    }

    #[test]
    fn test_snapshot_isolated_from_later_writes() {
        let catalog = SpatialCatalog::new();
        catalog.upsert_record(site(1, "A", -6.0, 53.0)).unwrap();
        let before = catalog.snapshot();

        catalog.upsert_record(site(2, "B", -7.0, 53.0)).unwrap();
        assert_eq!(before.site_count(), 1);
        assert_eq!(catalog.snapshot().site_count(), 2);
        assert!(catalog.snapshot().version() > before.version());
    }

    #[test]
    fn test_failed_batch_publishes_nothing() {
        let catalog = SpatialCatalog::new();
        catalog.upsert_record(site(1, "A", -6.0, 53.0)).unwrap();
        let version = catalog.stats().version;

        let result = catalog.update(|writer| {
            writer.upsert_site(site(2, "B", -7.0, 53.0))?;
            writer.upsert_site(site(3, "A", -8.0, 53.0))
        });

        assert!(result.is_err());
        assert_eq!(catalog.stats().total_sites, 1);
        assert_eq!(catalog.stats().version, version);
    }

    #[test]
    fn test_next_site_id_and_replace_all() {
        let catalog = SpatialCatalog::from_parts(
            vec![site(4, "A", -6.0, 53.0), site(7, "B", -7.0, 53.0)],
            vec![region("Dublin")],
        )
        .unwrap();

        let next = catalog.update(|writer| Ok(writer.next_site_id())).unwrap();
        assert_eq!(next, SiteId(8));

        catalog.replace_all(vec![site(1, "C", -8.0, 52.0)], Vec::new()).unwrap();
        let stats = catalog.stats();
        assert_eq!((stats.total_sites, stats.total_regions), (1, 0));
        assert_eq!(catalog.all_records()[0].name, "C");
    }

    #[test]
    fn test_sites_near_in_id_order() {
        let catalog = SpatialCatalog::from_parts(
            vec![site(3, "C", -6.26, 53.35), site(1, "A", -6.25, 53.34), site(2, "B", -9.0, 53.3)],
            Vec::new(),
        )
        .unwrap();

        let snapshot = catalog.snapshot();
        let ids: Vec<_> = snapshot
            .sites_near(&GeoPoint::new(-6.26, 53.35), 5.0)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![SiteId(1), SiteId(3)]);
    }
}
