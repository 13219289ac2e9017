//! GeoJSON rendering of catalog contents

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection};
use heritage_core::models::{BoundaryRegion, HistoricalSite};
use heritage_geo::models::{point_to_geojson, polygons_to_geojson};
use heritage_store::CatalogSnapshot;
use serde_json::{Map, Value as JsonValue};

/// Fill colours cycled over regions in name order
pub const REGION_PALETTE: [&str; 27] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
    "#F8B88B", "#A3E4D7", "#F1948A", "#85C1E2", "#F7DC6F", "#D7BDE2", "#A9DFBF", "#F8B88B",
    "#AED6F1", "#F1948A", "#D5A6BD", "#FAD7A0", "#85C1E2", "#F7DC6F", "#BB8FCE", "#A9CCE3",
    "#F8B88B", "#F1948A", "#AED6F1",
];

/// Colour assigned to the region at `position`
pub fn palette_color(position: usize) -> &'static str {
    REGION_PALETTE[position % REGION_PALETTE.len()]
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection { features, bbox: None, foreign_members: None }
}

/// Point feature for one site
pub fn site_feature(site: &HistoricalSite) -> Feature {
    let mut properties = Map::new();
    properties.insert("id".to_string(), JsonValue::from(site.id.0));
    properties.insert("name".to_string(), JsonValue::from(site.name.clone()));
    properties.insert("event_date".to_string(), JsonValue::from(site.event_date.to_string()));
    properties.insert("location_name".to_string(), JsonValue::from(site.location_name.clone()));
    properties.insert("category".to_string(), JsonValue::from(site.category.code()));
    properties.insert("event_type".to_string(), JsonValue::from(site.event_type.clone()));
    properties.insert("significance".to_string(), JsonValue::from(site.significance.clone()));
    properties.insert(
        "casualties".to_string(),
        site.casualties.map_or(JsonValue::Null, JsonValue::from),
    );

    Feature {
        geometry: Some(point_to_geojson(&site.location)),
        properties: Some(properties),
        id: Some(Id::Number(site.id.0.into())),
        bbox: None,
        foreign_members: None,
    }
}

/// All sites as point features, in id order
pub fn sites_collection(snapshot: &CatalogSnapshot) -> FeatureCollection {
    collection(snapshot.sites().map(|site| site_feature(site)).collect())
}

fn region_feature(region: &BoundaryRegion, id: usize, color: Option<&str>) -> Feature {
    let mut properties = Map::new();
    properties.insert("name".to_string(), JsonValue::from(region.name.clone()));
    if let Some(color) = color {
        properties.insert("color".to_string(), JsonValue::from(color));
    }
    properties.insert("id".to_string(), JsonValue::from(id));

    Feature {
        geometry: Some(polygons_to_geojson(&region.parts)),
        properties: Some(properties),
        id: None,
        bbox: None,
        foreign_members: None,
    }
}

/// Region boundaries in name order; ids are 1-based positions
pub fn regions_collection(snapshot: &CatalogSnapshot) -> FeatureCollection {
    collection(
        snapshot
            .regions()
            .enumerate()
            .map(|(position, region)| region_feature(region, position + 1, None))
            .collect(),
    )
}

/// Region boundaries with a palette colour per region
pub fn colored_regions_collection(snapshot: &CatalogSnapshot) -> FeatureCollection {
    collection(
        snapshot
            .regions()
            .enumerate()
            .map(|(position, region)| {
                region_feature(region, position + 1, Some(palette_color(position)))
            })
            .collect(),
    )
}
