mod request;
mod response;

pub use request::{
    BufferParams, NearbyParams, PolygonRequest, RegionParams, SiteListParams, TimelineParams,
};
pub use response::HealthResponse;
