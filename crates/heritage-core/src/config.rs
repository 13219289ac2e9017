use crate::error::{HeritageError, Result};
use crate::models::GeographicEnvelope;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Limits and constants the query engine works with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryLimits {
    /// Upper bound (inclusive) for proximity search radius
    pub max_nearby_radius_km: f64,
    /// Upper bound (inclusive) for buffer-zone radius
    pub max_buffer_radius_km: f64,
    /// Flat kilometres-per-degree factor used for degree buffers
    pub km_per_degree: f64,
    /// Number of segments approximating a buffer circle
    pub buffer_segments: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_nearby_radius_km: 500.0,
            max_buffer_radius_km: 100.0,
            km_per_degree: 111.0,
            buffer_segments: 32,
        }
    }
}

/// Layered configuration for heritage
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub envelope: ConfigValue<GeographicEnvelope>,
    pub max_nearby_radius_km: ConfigValue<f64>,
    pub default_nearby_radius_km: ConfigValue<f64>,
    pub max_buffer_radius_km: ConfigValue<f64>,
    pub default_buffer_radius_km: ConfigValue<f64>,
    pub km_per_degree: ConfigValue<f64>,
    pub buffer_segments: ConfigValue<usize>,
    pub boundary_crs: ConfigValue<u32>,
    pub site_crs: ConfigValue<u32>,
    pub query_timeout_ms: ConfigValue<Option<u64>>,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let limits = QueryLimits::default();
        Self {
            envelope: ConfigValue::new(GeographicEnvelope::ireland(), ConfigSource::Default),
            max_nearby_radius_km: ConfigValue::new(
                limits.max_nearby_radius_km,
                ConfigSource::Default,
            ),
            default_nearby_radius_km: ConfigValue::new(50.0, ConfigSource::Default),
            max_buffer_radius_km: ConfigValue::new(
                limits.max_buffer_radius_km,
                ConfigSource::Default,
            ),
            default_buffer_radius_km: ConfigValue::new(20.0, ConfigSource::Default),
            km_per_degree: ConfigValue::new(limits.km_per_degree, ConfigSource::Default),
            buffer_segments: ConfigValue::new(limits.buffer_segments, ConfigSource::Default),
            boundary_crs: ConfigValue::new(2157, ConfigSource::Default),
            site_crs: ConfigValue::new(4326, ConfigSource::Default),
            query_timeout_ms: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| HeritageError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| HeritageError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(envelope) = file_config.envelope {
            self.envelope.update(envelope, ConfigSource::File);
        }
        if let Some(v) = file_config.max_nearby_radius_km {
            self.max_nearby_radius_km.update(v, ConfigSource::File);
        }
        if let Some(v) = file_config.default_nearby_radius_km {
            self.default_nearby_radius_km.update(v, ConfigSource::File);
        }
        if let Some(v) = file_config.max_buffer_radius_km {
            self.max_buffer_radius_km.update(v, ConfigSource::File);
        }
        if let Some(v) = file_config.default_buffer_radius_km {
            self.default_buffer_radius_km.update(v, ConfigSource::File);
        }
        if let Some(v) = file_config.km_per_degree {
            self.km_per_degree.update(v, ConfigSource::File);
        }
        if let Some(v) = file_config.buffer_segments {
            self.buffer_segments.update(v, ConfigSource::File);
        }
        if let Some(v) = file_config.boundary_crs {
            self.boundary_crs.update(v, ConfigSource::File);
        }
        if let Some(v) = file_config.site_crs {
            self.site_crs.update(v, ConfigSource::File);
        }
        if let Some(v) = file_config.query_timeout_ms {
            self.query_timeout_ms.update(Some(v), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // HERITAGE_ENVELOPE="min_lon,max_lon,min_lat,max_lat"
        if let Ok(envelope_str) = env::var("HERITAGE_ENVELOPE") {
            match parse_envelope(&envelope_str) {
                Ok(envelope) => self.envelope.update(envelope, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HERITAGE_ENVELOPE value '{}': expected min_lon,max_lon,min_lat,max_lat",
                    envelope_str
                ),
            }
        }

        update_km_from_env(&mut self.max_nearby_radius_km, "HERITAGE_MAX_NEARBY_RADIUS_KM");
        update_km_from_env(
            &mut self.default_nearby_radius_km,
            "HERITAGE_DEFAULT_NEARBY_RADIUS_KM",
        );
        update_km_from_env(&mut self.max_buffer_radius_km, "HERITAGE_MAX_BUFFER_RADIUS_KM");
        update_km_from_env(
            &mut self.default_buffer_radius_km,
            "HERITAGE_DEFAULT_BUFFER_RADIUS_KM",
        );
        update_km_from_env(&mut self.km_per_degree, "HERITAGE_KM_PER_DEGREE");

        if let Ok(segments_str) = env::var("HERITAGE_BUFFER_SEGMENTS") {
            match segments_str.parse::<usize>() {
                Ok(segments) => self.buffer_segments.update(segments, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HERITAGE_BUFFER_SEGMENTS value '{}': expected positive integer",
                    segments_str
                ),
            }
        }

        update_epsg_from_env(&mut self.boundary_crs, "HERITAGE_BOUNDARY_CRS");
        update_epsg_from_env(&mut self.site_crs, "HERITAGE_SITE_CRS");

        if let Ok(timeout_str) = env::var("HERITAGE_QUERY_TIMEOUT_MS") {
            match timeout_str.parse::<u64>() {
                Ok(ms) => self.query_timeout_ms.update(Some(ms), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HERITAGE_QUERY_TIMEOUT_MS value '{}': expected milliseconds",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(envelope) = overrides.envelope {
            self.envelope.update(envelope, ConfigSource::Cli);
        }

        if let Some(crs) = overrides.boundary_crs {
            self.boundary_crs.update(crs, ConfigSource::Cli);
        }

        if let Some(crs) = overrides.site_crs {
            self.site_crs.update(crs, ConfigSource::Cli);
        }

        if let Some(ms) = overrides.query_timeout_ms {
            self.query_timeout_ms.update(Some(ms), ConfigSource::Cli);
        }
    }

    /// Check cross-field consistency of the resolved values
    pub fn validate(&self) -> Result<()> {
        if !self.envelope.value.is_well_formed() {
            return Err(HeritageError::ConfigInvalid {
                key: "envelope".to_string(),
                reason: format!("minimum must be below maximum: {}", self.envelope.value),
            });
        }

        let radii = [
            ("max_nearby_radius_km", self.max_nearby_radius_km.value),
            ("max_buffer_radius_km", self.max_buffer_radius_km.value),
            ("km_per_degree", self.km_per_degree.value),
        ];
        for (key, value) in radii {
            if !(value.is_finite() && value > 0.0) {
                return Err(HeritageError::ConfigInvalid {
                    key: key.to_string(),
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }

        if !(self.default_nearby_radius_km.value > 0.0
            && self.default_nearby_radius_km.value <= self.max_nearby_radius_km.value)
        {
            return Err(HeritageError::ConfigInvalid {
                key: "default_nearby_radius_km".to_string(),
                reason: "must lie within (0, max_nearby_radius_km]".to_string(),
            });
        }

        if !(self.default_buffer_radius_km.value > 0.0
            && self.default_buffer_radius_km.value <= self.max_buffer_radius_km.value)
        {
            return Err(HeritageError::ConfigInvalid {
                key: "default_buffer_radius_km".to_string(),
                reason: "must lie within (0, max_buffer_radius_km]".to_string(),
            });
        }

        if self.buffer_segments.value < 4 {
            return Err(HeritageError::ConfigInvalid {
                key: "buffer_segments".to_string(),
                reason: format!("need at least 4 segments, got {}", self.buffer_segments.value),
            });
        }

        Ok(())
    }

    /// Limits handed to the query engine
    pub fn query_limits(&self) -> QueryLimits {
        QueryLimits {
            max_nearby_radius_km: self.max_nearby_radius_km.value,
            max_buffer_radius_km: self.max_buffer_radius_km.value,
            km_per_degree: self.km_per_degree.value,
            buffer_segments: self.buffer_segments.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "envelope".to_string(),
            (self.envelope.value.to_string(), self.envelope.source),
        );
        map.insert(
            "max_nearby_radius_km".to_string(),
            (self.max_nearby_radius_km.value.to_string(), self.max_nearby_radius_km.source),
        );
        map.insert(
            "default_nearby_radius_km".to_string(),
            (
                self.default_nearby_radius_km.value.to_string(),
                self.default_nearby_radius_km.source,
            ),
        );
        map.insert(
            "max_buffer_radius_km".to_string(),
            (self.max_buffer_radius_km.value.to_string(), self.max_buffer_radius_km.source),
        );
        map.insert(
            "default_buffer_radius_km".to_string(),
            (
                self.default_buffer_radius_km.value.to_string(),
                self.default_buffer_radius_km.source,
            ),
        );
        map.insert(
            "km_per_degree".to_string(),
            (self.km_per_degree.value.to_string(), self.km_per_degree.source),
        );
        map.insert(
            "buffer_segments".to_string(),
            (self.buffer_segments.value.to_string(), self.buffer_segments.source),
        );
        map.insert(
            "boundary_crs".to_string(),
            (format!("EPSG:{}", self.boundary_crs.value), self.boundary_crs.source),
        );
        map.insert(
            "site_crs".to_string(),
            (format!("EPSG:{}", self.site_crs.value), self.site_crs.source),
        );
        map.insert(
            "query_timeout_ms".to_string(),
            (
                self.query_timeout_ms
                    .value
                    .map(|ms| ms.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                self.query_timeout_ms.source,
            ),
        );

        map
    }
}

fn update_km_from_env(value: &mut ConfigValue<f64>, var: &str) {
    if let Ok(raw) = env::var(var) {
        match parse_positive_f64(var, &raw) {
            Ok(km) => value.update(km, ConfigSource::Environment),
            Err(_) => tracing::warn!("Invalid {} value '{}': expected positive number", var, raw),
        }
    }
}

fn update_epsg_from_env(value: &mut ConfigValue<u32>, var: &str) {
    if let Ok(raw) = env::var(var) {
        match raw.trim().trim_start_matches("EPSG:").parse::<u32>() {
            Ok(epsg) => value.update(epsg, ConfigSource::Environment),
            Err(_) => {
                tracing::warn!("Invalid {} value '{}': expected integer EPSG code", var, raw)
            }
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    envelope: Option<GeographicEnvelope>,
    max_nearby_radius_km: Option<f64>,
    default_nearby_radius_km: Option<f64>,
    max_buffer_radius_km: Option<f64>,
    default_buffer_radius_km: Option<f64>,
    km_per_degree: Option<f64>,
    buffer_segments: Option<usize>,
    boundary_crs: Option<u32>,
    site_crs: Option<u32>,
    query_timeout_ms: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub envelope: Option<GeographicEnvelope>,
    pub boundary_crs: Option<u32>,
    pub site_crs: Option<u32>,
    pub query_timeout_ms: Option<u64>,
}

/// Parse an envelope from `min_lon,max_lon,min_lat,max_lat`
pub fn parse_envelope(s: &str) -> Result<GeographicEnvelope> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| HeritageError::ConfigInvalid {
            key: "envelope".to_string(),
            reason: format!("Invalid number in '{}': {}", s, e),
        })?;

    match parts.as_slice() {
        [min_lon, max_lon, min_lat, max_lat] => {
            let envelope = GeographicEnvelope::new(*min_lon, *max_lon, *min_lat, *max_lat);
            if envelope.is_well_formed() {
                Ok(envelope)
            } else {
                Err(HeritageError::ConfigInvalid {
                    key: "envelope".to_string(),
                    reason: format!("minimum must be below maximum: {}", s),
                })
            }
        }
        _ => Err(HeritageError::ConfigInvalid {
            key: "envelope".to_string(),
            reason: format!("expected 4 comma-separated values, found {}", parts.len()),
        }),
    }
}

/// Parse a strictly positive, finite number
pub fn parse_positive_f64(key: &str, s: &str) -> Result<f64> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(HeritageError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("expected a positive number, got '{}'", s),
        }),
    }
}
