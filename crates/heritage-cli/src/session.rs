//! Catalog built from the files named on the command line

use anyhow::{Context, Result};
use heritage_core::config::LayeredConfig;
use heritage_query::QueryEngine;
use heritage_store::{CatalogLoader, SpatialCatalog};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Cli;
use crate::config_loader::load_config;
use crate::output_types::LoadOutput;

pub struct Session {
    pub settings: LayeredConfig,
    pub engine: QueryEngine,
    pub load: LoadOutput,
}

impl Session {
    /// Resolve configuration, then load boundaries, sites and enrichment in that order
    pub fn open(cli: &Cli) -> Result<Self> {
        let settings = load_config(cli)?;
        let catalog = Arc::new(SpatialCatalog::new());
        let loader = CatalogLoader::from_config(&catalog, &settings);

        let boundaries = cli
            .boundaries
            .as_deref()
            .map(|path| {
                loader
                    .load_boundaries_file(path)
                    .with_context(|| format!("Failed to load boundaries from {}", path.display()))
            })
            .transpose()?;
        let sites = cli
            .sites
            .as_deref()
            .map(|path| {
                loader
                    .load_sites_file(path)
                    .with_context(|| format!("Failed to load sites from {}", path.display()))
            })
            .transpose()?;
        let enrichment = cli
            .enrich
            .as_deref()
            .map(|path| {
                loader
                    .enrich_sites_file(path)
                    .with_context(|| format!("Failed to enrich sites from {}", path.display()))
            })
            .transpose()?;

        let stats = catalog.stats();
        let load = LoadOutput {
            boundaries,
            sites,
            enrichment,
            total_sites: stats.total_sites,
            total_regions: stats.total_regions,
        };

        let engine = QueryEngine::new(catalog)
            .with_limits(settings.query_limits())
            .with_timeout(settings.query_timeout_ms.value.map(Duration::from_millis));

        Ok(Self { settings, engine, load })
    }
}
