mod counties;
mod health;
mod sites;
mod spatial;

pub use counties::{counties_geojson, counties_geojson_with_colors, list_counties, stats};
pub use health::health_check;
pub use sites::{categories, get_site, list_sites, sites_geojson, timeline};
pub use spatial::{buffer_zone, in_polygon, in_region, nearby, nearby_post};
