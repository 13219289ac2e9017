//! Heritage Store - The in-memory spatial catalog and its batch loaders
//!
//! The catalog is an explicitly owned instance: readers take a cheap
//! snapshot, writers build a new snapshot and swap it in atomically.

pub mod catalog;
pub mod index;
pub mod loader;

pub use catalog::{CatalogSnapshot, CatalogStats, CatalogWriter, SpatialCatalog, UpsertOutcome};
pub use index::SiteIndex;
pub use loader::{CatalogLoader, EnrichSummary, LoadFailure, LoadSummary};
