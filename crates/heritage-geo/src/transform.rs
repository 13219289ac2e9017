//! CRS transformation and normalization

use heritage_core::error::{HeritageError, Result};
use heritage_core::models::{Crs, GeoPoint, Polygon, Ring};
use proj4rs::proj::Proj;

const WGS84_DEFINITION: &str = "+proj=longlat +datum=WGS84 +no_defs";

const ITM_DEFINITION: &str = "+proj=tmerc +lat_0=53.5 +lon_0=-8 +k=0.99982 +x_0=600000 \
     +y_0=750000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// Check if two CRS are the same
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.epsg == crs2.epsg
}

/// Proj definition for the CRSs the catalog understands
fn proj_definition(crs: &Crs) -> Result<&'static str> {
    match crs.epsg {
        4326 => Ok(WGS84_DEFINITION),
        2157 => Ok(ITM_DEFINITION),
        epsg => Err(HeritageError::UnsupportedCrs { epsg }),
    }
}

/// Transform a single point between two explicit CRSs
pub fn transform(point: &GeoPoint, from: &Crs, to: &Crs) -> Result<GeoPoint> {
    CoordinateTransformer::new(from, to)?.transform_point(point)
}

/// A transformation between two known CRSs, built once per batch.
///
/// Geographic coordinates go in and come out as degrees; projected ones as
/// metres. Identical source and target CRSs return the input unchanged.
pub struct CoordinateTransformer {
    from: Crs,
    to: Crs,
    projections: Option<(Proj, Proj)>,
}

impl std::fmt::Debug for CoordinateTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinateTransformer")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl CoordinateTransformer {
    pub fn new(from: &Crs, to: &Crs) -> Result<Self> {
        let source = proj_definition(from)?;
        let target = proj_definition(to)?;

        let projections = if crs_match(from, to) {
            None
        } else {
            let build = |definition: &str| {
                Proj::from_proj_string(definition).map_err(|e| HeritageError::Transform {
                    from: from.to_string(),
                    to: to.to_string(),
                    reason: format!("invalid projection definition: {}", e),
                })
            };
            Some((build(source)?, build(target)?))
        };

        Ok(Self { from: from.clone(), to: to.clone(), projections })
    }

    pub fn source(&self) -> &Crs {
        &self.from
    }

    pub fn target(&self) -> &Crs {
        &self.to
    }

    pub fn transform_point(&self, point: &GeoPoint) -> Result<GeoPoint> {
        self.check_input(point)?;

        let Some((source, target)) = &self.projections else {
            return Ok(*point);
        };

        let mut xyz = if self.from.is_geographic() {
            (point.lon.to_radians(), point.lat.to_radians(), 0.0)
        } else {
            (point.lon, point.lat, 0.0)
        };

        proj4rs::transform::transform(source, target, &mut xyz).map_err(|e| {
            HeritageError::Transform {
                from: self.from.to_string(),
                to: self.to.to_string(),
                reason: e.to_string(),
            }
        })?;

        let out = if self.to.is_geographic() {
            GeoPoint::new(xyz.0.to_degrees(), xyz.1.to_degrees())
        } else {
            GeoPoint::new(xyz.0, xyz.1)
        };

        if !out.is_finite() || (self.to.is_geographic() && !out.in_wgs84_range()) {
            return Err(HeritageError::Transform {
                from: self.from.to_string(),
                to: self.to.to_string(),
                reason: format!("{} has no valid image", point),
            });
        }
        Ok(out)
    }

    pub fn transform_ring(&self, ring: &Ring) -> Result<Ring> {
        ring.vertices()
            .iter()
            .map(|p| self.transform_point(p))
            .collect::<Result<Vec<_>>>()
            .map(Ring::new)
    }

    pub fn transform_polygon(&self, polygon: &Polygon) -> Result<Polygon> {
        Ok(Polygon::new(
            self.transform_ring(&polygon.exterior)?,
            polygon.holes.iter().map(|h| self.transform_ring(h)).collect::<Result<Vec<_>>>()?,
        ))
    }

    pub fn transform_polygons(&self, parts: &[Polygon]) -> Result<Vec<Polygon>> {
        parts.iter().map(|p| self.transform_polygon(p)).collect()
    }

    /// Reject input that cannot belong to the declared source CRS.
    ///
    /// Small values under a projected CRS are degrees with a wrong label;
    /// metre-scale ITM values never fall inside the degree ranges.
    fn check_input(&self, point: &GeoPoint) -> Result<()> {
        if !point.is_finite() {
            return Err(HeritageError::invalid_geometry(
                point.to_string(),
                "coordinates must be finite",
            ));
        }

        if self.from.is_geographic() {
            if !point.in_wgs84_range() {
                return Err(HeritageError::invalid_parameter(
                    "coordinates",
                    format!("{} is outside longitude [-180, 180] / latitude [-90, 90]", point),
                ));
            }
        } else if point.in_wgs84_range() {
            return Err(HeritageError::invalid_geometry(
                point.to_string(),
                format!("coordinates look like longitude/latitude but are declared as {}", self.from),
            ));
        }
        Ok(())
    }
}
