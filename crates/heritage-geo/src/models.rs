//! Geometry conversions for heritage-geo.
//!
//! Canonical types live in `heritage-core`; this module bridges them to the
//! `geo` crate for the algorithms and to `geojson` for ingest and output.

use geojson::{PolygonType, Position};
use heritage_core::error::{HeritageError, Result};

pub use heritage_core::models::{BoundaryRegion, Crs, GeoPoint, Polygon, Ring};

pub fn to_geo_coord(point: &GeoPoint) -> geo::Coord<f64> {
    geo::Coord { x: point.lon, y: point.lat }
}

pub fn to_geo_point(point: &GeoPoint) -> geo::Point<f64> {
    geo::Point::new(point.lon, point.lat)
}

pub fn to_geo_line_string(ring: &Ring) -> geo::LineString<f64> {
    geo::LineString::new(ring.vertices().iter().map(to_geo_coord).collect())
}

/// Convert to a `geo::Polygon`. Open rings are closed by `geo`.
pub fn to_geo_polygon(polygon: &Polygon) -> geo::Polygon<f64> {
    geo::Polygon::new(
        to_geo_line_string(&polygon.exterior),
        polygon.holes.iter().map(to_geo_line_string).collect(),
    )
}

pub fn to_geo_multi_polygon(parts: &[Polygon]) -> geo::MultiPolygon<f64> {
    geo::MultiPolygon::new(parts.iter().map(to_geo_polygon).collect())
}

/// Read a GeoJSON position as a point, ignoring any third ordinate
pub fn point_from_position(position: &Position, feature_id: &str) -> Result<GeoPoint> {
    match position.as_slice() {
        [x, y, ..] => Ok(GeoPoint::new(*x, *y)),
        _ => Err(HeritageError::invalid_geometry(
            feature_id,
            format!("position has {} ordinates, expected at least 2", position.len()),
        )),
    }
}

fn ring_from_positions(positions: &[Position], feature_id: &str) -> Result<Ring> {
    positions
        .iter()
        .map(|p| point_from_position(p, feature_id))
        .collect::<Result<Vec<_>>>()
        .map(Ring::new)
}

fn polygon_from_rings(rings: &PolygonType, feature_id: &str) -> Result<Polygon> {
    let (exterior, holes) = rings.split_first().ok_or_else(|| {
        HeritageError::invalid_geometry(feature_id, "polygon has no exterior ring")
    })?;

    Ok(Polygon::new(
        ring_from_positions(exterior, feature_id)?,
        holes
            .iter()
            .map(|hole| ring_from_positions(hole, feature_id))
            .collect::<Result<Vec<_>>>()?,
    ))
}

/// Extract the polygon parts of a GeoJSON Polygon or MultiPolygon.
///
/// Coordinates are returned exactly as stored; no CRS handling happens here.
pub fn polygons_from_geojson(value: &geojson::Value, feature_id: &str) -> Result<Vec<Polygon>> {
    match value {
        geojson::Value::Polygon(rings) => Ok(vec![polygon_from_rings(rings, feature_id)?]),
        geojson::Value::MultiPolygon(polygons) => polygons
            .iter()
            .map(|rings| polygon_from_rings(rings, feature_id))
            .collect(),
        other => Err(HeritageError::invalid_geometry(
            feature_id,
            format!("expected Polygon or MultiPolygon, found {}", other.type_name()),
        )),
    }
}

fn ring_to_positions(ring: &Ring) -> Vec<Position> {
    ring.vertices().iter().map(|p| vec![p.lon, p.lat]).collect()
}

fn polygon_to_rings(polygon: &Polygon) -> PolygonType {
    polygon.rings().map(ring_to_positions).collect()
}

/// Encode polygon parts as GeoJSON, using a plain Polygon for single parts
pub fn polygons_to_geojson(parts: &[Polygon]) -> geojson::Geometry {
    let value = match parts {
        [single] => geojson::Value::Polygon(polygon_to_rings(single)),
        many => geojson::Value::MultiPolygon(many.iter().map(polygon_to_rings).collect()),
    };
    geojson::Geometry::new(value)
}

pub fn point_to_geojson(point: &GeoPoint) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::Point(vec![point.lon, point.lat]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_value() -> geojson::Value {
        geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![2.0, 0.0],
            vec![2.0, 2.0],
            vec![0.0, 2.0],
            vec![0.0, 0.0],
        ]])
    }

    #[test]
    fn test_polygon_from_geojson() {
        let parts = polygons_from_geojson(&square_value(), "f1").unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].exterior.len(), 5);
        assert!(parts[0].holes.is_empty());
    }

    #[test]
    fn test_multipolygon_with_hole() {
        let value = geojson::Value::MultiPolygon(vec![
            vec![
                vec![vec![0.0, 0.0], vec![4.0, 0.0], vec![4.0, 4.0], vec![0.0, 4.0], vec![0.0, 0.0]],
                vec![vec![1.0, 1.0], vec![2.0, 1.0], vec![2.0, 2.0], vec![1.0, 2.0], vec![1.0, 1.0]],
            ],
            vec![vec![vec![5.0, 5.0], vec![6.0, 5.0], vec![6.0, 6.0], vec![5.0, 5.0]]],
        ]);

        let parts = polygons_from_geojson(&value, "islands").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].holes.len(), 1);

        let geometry = polygons_to_geojson(&parts);
        assert_eq!(geometry.value.type_name(), "MultiPolygon");
    }

    #[test]
    fn test_rejects_non_polygon_geometry() {
        let value = geojson::Value::Point(vec![-6.26, 53.35]);
        let err = polygons_from_geojson(&value, "spot").unwrap_err();
        assert!(matches!(err, HeritageError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_rejects_short_position() {
        let value = geojson::Value::Polygon(vec![vec![vec![1.0]]]);
        assert!(polygons_from_geojson(&value, "bad").is_err());
    }

    #[test]
    fn test_third_ordinate_ignored() {
        let point = point_from_position(&vec![-6.26, 53.35, 12.0], "p").unwrap();
        assert_eq!(point, GeoPoint::new(-6.26, 53.35));
    }
}
