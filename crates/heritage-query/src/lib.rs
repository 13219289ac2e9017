//! Heritage Query - Spatial and temporal queries over the catalog
//!
//! Every operation takes one catalog snapshot and is read-only with respect
//! to it. Linear scans honour an optional deadline and cancellation flag.

pub mod control;
pub mod engine;
pub mod export;
pub mod models;

pub use control::{CancelFlag, QueryControl};
pub use engine::{Query, QueryEngine};
pub use export::{colored_regions_collection, regions_collection, sites_collection};
pub use models::{
    BufferResponse, Coordinates, DateRange, NearbyResponse, PolygonResponse, RegionResponse,
    RegionSummary, SiteDetail, SiteFilter, SiteSummary, TimelineResponse,
};
