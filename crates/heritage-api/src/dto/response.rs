use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub sites: usize,
    pub regions: usize,
}

impl HealthResponse {
    pub fn new(sites: usize, regions: usize) -> Self {
        Self { status: "ok", service: "heritage-api", sites, regions }
    }
}
