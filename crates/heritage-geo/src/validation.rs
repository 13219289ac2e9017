//! Admission rules for sites, boundaries and caller-supplied polygons.

use crate::models::to_geo_line_string;
use crate::spatial::region_centroid;
use crate::transform::CoordinateTransformer;
use geo::Area;
use heritage_core::error::{HeritageError, Result};
use heritage_core::models::{BoundaryRegion, Crs, GeoPoint, GeographicEnvelope, Polygon, Ring};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// Fold into a `Result`, reporting the first error against `feature_id`
    pub fn into_result(self, feature_id: &str) -> Result<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(error) => Err(HeritageError::invalid_geometry(
                feature_id,
                format!("{}: {}", error.location, error.reason),
            )),
        }
    }
}

fn validate_ring(ring: &Ring, location: &str, result: &mut ValidationResult) {
    if ring.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("ring must have at least 4 points, found {}", ring.len()),
        );
        return;
    }

    if !ring.is_closed() {
        result.add_error(
            location.to_string(),
            "ring must be closed (first point == last point)".to_string(),
        );
    }

    if let Some((i, _)) = ring.vertices().iter().enumerate().find(|(_, p)| !p.is_finite()) {
        result.add_error(format!("{}[{}]", location, i), "coordinates must be finite".to_string());
        return;
    }

    if geo::Polygon::new(to_geo_line_string(ring), vec![]).unsigned_area() <= 0.0 {
        result.add_error(location.to_string(), "ring has zero area".to_string());
    }
}

/// Structural validity of a stored polygon: closed rings of at least four
/// points, finite coordinates, non-zero area
pub fn validate_polygon(polygon: &Polygon) -> ValidationResult {
    let mut result = ValidationResult::valid();
    validate_ring(&polygon.exterior, "exterior", &mut result);
    for (i, hole) in polygon.holes.iter().enumerate() {
        validate_ring(hole, &format!("interior[{}]", i), &mut result);
    }
    result
}

/// Accept a caller-drawn query ring.
///
/// The ring may be open; it is closed implicitly. At least three distinct
/// vertices are required.
pub fn validate_query_ring(ring: &Ring) -> Result<Polygon> {
    if ring.vertices().iter().any(|p| !p.is_finite()) {
        return Err(HeritageError::invalid_geometry("polygon", "coordinates must be finite"));
    }

    let distinct = ring.distinct_vertex_count();
    if distinct < 3 {
        return Err(HeritageError::invalid_geometry(
            "polygon",
            format!("polygon needs at least 3 distinct vertices, found {}", distinct),
        ));
    }

    Ok(Polygon::from_ring(Ring::closed(ring.vertices().to_vec())))
}

/// Gatekeeper applied by every loader before a record reaches the catalog.
///
/// Everything admitted comes out in WGS84. Boundaries additionally must
/// land inside the configured envelope after transformation.
#[derive(Debug, Clone, Default)]
pub struct IngestValidator {
    envelope: GeographicEnvelope,
}

impl IngestValidator {
    pub fn new(envelope: GeographicEnvelope) -> Self {
        Self { envelope }
    }

    pub fn envelope(&self) -> &GeographicEnvelope {
        &self.envelope
    }

    /// Validate a site location declared in `crs` and return it in WGS84.
    ///
    /// Projected input must land inside the envelope once transformed, the
    /// same rule boundaries follow.
    pub fn admit_site_location(&self, name: &str, point: &GeoPoint, crs: &Crs) -> Result<GeoPoint> {
        if !point.is_finite() {
            return Err(HeritageError::invalid_geometry(name, "coordinates must be finite"));
        }

        if crs.is_geographic() {
            if !point.in_wgs84_range() {
                return Err(HeritageError::invalid_parameter(
                    "location",
                    format!("{} for '{}' is outside the valid latitude/longitude range", point, name),
                ));
            }
            return Ok(*point);
        }

        let transformer = CoordinateTransformer::new(crs, &Crs::wgs84())?;
        let wgs84 = transformer.transform_point(point)?;
        if !self.envelope.contains(&wgs84) {
            return Err(HeritageError::GeometryOutOfRange {
                name: name.to_string(),
                centroid: wgs84.as_array(),
            });
        }
        Ok(wgs84)
    }

    /// Reproject, validate and envelope-check a boundary
    pub fn admit_boundary(&self, name: &str, parts: &[Polygon], crs: &Crs) -> Result<BoundaryRegion> {
        if parts.is_empty() {
            return Err(HeritageError::invalid_geometry(name, "boundary has no polygons"));
        }

        let transformer = CoordinateTransformer::new(crs, &Crs::wgs84())?;
        let parts = transformer.transform_polygons(parts)?;

        for (i, part) in parts.iter().enumerate() {
            validate_polygon(part).into_result(&format!("{} part {}", name, i))?;
        }

        let region = BoundaryRegion::new(name, parts);
        let centroid = region_centroid(&region)
            .ok_or_else(|| HeritageError::invalid_geometry(name, "boundary has no vertices"))?;

        if !self.envelope.contains(&centroid) {
            return Err(HeritageError::GeometryOutOfRange {
                name: region.name,
                centroid: centroid.as_array(),
            });
        }

        tracing::debug!(region = %region.name, %centroid, "Boundary admitted");
        Ok(region)
    }
}
