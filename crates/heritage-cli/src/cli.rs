use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Heritage - spatial queries over historical sites
#[derive(Parser, Debug)]
#[command(name = "heritage")]
#[command(about = "Load historical sites and county boundaries and query them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Site file (JSON array of events)
    #[arg(long, global = true, value_name = "FILE")]
    pub sites: Option<PathBuf>,

    /// Boundary file (GeoJSON FeatureCollection)
    #[arg(long, global = true, value_name = "FILE")]
    pub boundaries: Option<PathBuf>,

    /// Enrichment file (descriptions and images keyed by site name)
    #[arg(long, global = true, value_name = "FILE")]
    pub enrich: Option<PathBuf>,

    /// Configuration file (defaults to ./heritage.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sanity envelope as min_lon,max_lon,min_lat,max_lat
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub envelope: Option<String>,

    /// EPSG code of the site file coordinates
    #[arg(long, global = true)]
    pub site_crs: Option<u32>,

    /// EPSG code of the boundary file coordinates
    #[arg(long, global = true)]
    pub boundary_crs: Option<u32>,

    /// Abort queries that run longer than this many milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the loaders and report what was created, updated and skipped
    Load,

    /// Sites within a radius of a point, nearest first
    Nearby(NearbyArgs),

    /// Sites inside a polygon
    Polygon(PolygonArgs),

    /// Sites within a buffer around another site
    Buffer(BufferArgs),

    /// Sites inside a county
    Region(RegionArgs),

    /// Sites within a date range
    Timeline(TimelineArgs),

    /// Site counts per category
    Categories,

    /// Loaded county boundaries
    Counties,

    /// Show resolved configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct NearbyArgs {
    /// Latitude of the center (WGS84)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude of the center (WGS84)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Search radius in kilometres (defaults to the configured radius)
    #[arg(long)]
    pub radius_km: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct PolygonArgs {
    /// Ring as a JSON array of [lon, lat] pairs, e.g. '[[-6.3,53.3],[-6.2,53.3],[-6.2,53.4]]'
    #[arg(allow_hyphen_values = true)]
    pub ring: String,
}

#[derive(Parser, Debug)]
pub struct BufferArgs {
    /// Identifier of the center site
    pub site_id: u64,

    /// Buffer radius in kilometres (defaults to the configured radius)
    #[arg(long)]
    pub buffer_km: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct RegionArgs {
    /// County name, case-insensitive
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct TimelineArgs {
    /// First date included (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last date included (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}
