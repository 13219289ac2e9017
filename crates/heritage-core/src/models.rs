pub mod geometry;
pub mod region;
pub mod site;

pub use geometry::{BoundingBox, Crs, GeoPoint, GeographicEnvelope, Polygon, Ring};
pub use region::BoundaryRegion;
pub use site::{Category, HistoricalSite, SiteId};
