//! Error types for heritage

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeritageError {
    // Caller input errors
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    // Geometry errors
    #[error("Geometry for {name} is out of range after transform (centroid: {:.4}, {:.4})", .centroid[0], .centroid[1])]
    GeometryOutOfRange { name: String, centroid: [f64; 2] },

    #[error("Invalid geometry at feature {feature_id}: {reason}")]
    InvalidGeometry { feature_id: String, reason: String },

    // CRS errors
    #[error("Unsupported CRS: EPSG:{epsg}")]
    UnsupportedCrs { epsg: u32 },

    #[error("Transform from {from} to {to} failed: {reason}")]
    Transform {
        from: String,
        to: String,
        reason: String,
    },

    // Query control
    #[error("Query deadline exceeded after scanning {scanned} records")]
    DeadlineExceeded { scanned: usize },

    #[error("Query cancelled")]
    Cancelled,

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HeritageError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name: name.into(), reason: reason.into() }
    }

    pub fn not_found(kind: impl Into<String>, key: impl ToString) -> Self {
        Self::NotFound { kind: kind.into(), key: key.to_string() }
    }

    pub fn invalid_geometry(feature_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry { feature_id: feature_id.into(), reason: reason.into() }
    }
}

impl From<serde_json::Error> for HeritageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HeritageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_carries_centroid() {
        let err = HeritageError::GeometryOutOfRange {
            name: "CORK".to_string(),
            centroid: [-2.123456, 49.5],
        };
        let message = err.to_string();
        assert!(message.contains("CORK"));
        assert!(message.contains("-2.1235"));
        assert!(message.contains("49.5000"));
    }

    #[test]
    fn test_not_found_message() {
        let err = HeritageError::not_found("Region", "KERRY");
        assert_eq!(err.to_string(), "Region not found: KERRY");
    }
}
