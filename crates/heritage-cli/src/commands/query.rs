//! Spatial and temporal query commands

use anyhow::{Context, Result};
use heritage_core::models::{GeoPoint, Ring, SiteId};

use crate::cli::{BufferArgs, NearbyArgs, PolygonArgs, RegionArgs, TimelineArgs};
use crate::output::OutputWriter;
use crate::output_types::site_rows;
use crate::session::Session;

pub fn nearby(args: NearbyArgs, session: &Session, output: &OutputWriter) -> Result<()> {
    let radius_km = args.radius_km.unwrap_or(session.settings.default_nearby_radius_km.value);
    let response = session.engine.nearby(GeoPoint::new(args.lon, args.lat), radius_km)?;
    output.result(&response)?;

    output.section("Nearby Sites");
    output.kv("Center", format!("{}, {}", response.center.latitude, response.center.longitude));
    output.kv("Radius", format!("{} km", response.radius_km));
    output.kv("Found", response.count);
    output.table(site_rows(&response.sites));
    Ok(())
}

/// Parse `[[lon, lat], ...]`
fn parse_ring(raw: &str) -> Result<Ring> {
    let coords: Vec<[f64; 2]> = serde_json::from_str(raw)
        .context("Ring must be a JSON array of [lon, lat] pairs")?;
    Ok(Ring::from_coords(&coords))
}

pub fn polygon(args: PolygonArgs, session: &Session, output: &OutputWriter) -> Result<()> {
    let ring = parse_ring(&args.ring)?;
    let response = session.engine.within_polygon(&ring)?;
    output.result(&response)?;

    output.section("Sites in Polygon");
    output.kv("Vertices", ring.len());
    output.kv("Found", response.count);
    output.table(site_rows(&response.sites));
    Ok(())
}

pub fn buffer(args: BufferArgs, session: &Session, output: &OutputWriter) -> Result<()> {
    let buffer_km = args.buffer_km.unwrap_or(session.settings.default_buffer_radius_km.value);
    let response = session.engine.within_buffer(SiteId(args.site_id), buffer_km)?;
    output.result(&response)?;

    output.section(format!("Buffer Zone around {}", response.center_site));
    output.kv(
        "Center",
        format!("{}, {}", response.center_location.latitude, response.center_location.longitude),
    );
    output.kv("Buffer", format!("{} km", response.buffer_km));
    output.kv("Found", response.count);
    output.table(site_rows(&response.sites));
    Ok(())
}

pub fn region(args: RegionArgs, session: &Session, output: &OutputWriter) -> Result<()> {
    let response = session.engine.within_region(&args.name)?;
    output.result(&response)?;

    output.section(format!("Sites in {}", response.region));
    output.kv("Found", response.count);
    output.table(site_rows(&response.sites));
    Ok(())
}

pub fn timeline(args: TimelineArgs, session: &Session, output: &OutputWriter) -> Result<()> {
    let response = session.engine.timeline(args.start, args.end)?;
    output.result(&response)?;

    let bound = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "…".to_string(), |d| d.to_string());
    output.section(format!("Timeline {} to {}", bound(args.start), bound(args.end)));
    output.kv("Found", response.count);
    output.table(site_rows(&response.sites));
    Ok(())
}
