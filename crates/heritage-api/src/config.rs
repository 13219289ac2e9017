use std::env;
use std::path::PathBuf;

use heritage_core::config::LayeredConfig;
use heritage_core::error::Result;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub sites_file: Option<PathBuf>,
    pub boundaries_file: Option<PathBuf>,
    pub enrich_file: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_origin: "http://localhost:3000".to_string(),
            sites_file: None,
            boundaries_file: None,
            enrich_file: None,
            config_file: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("HERITAGE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let cors_origin = env::var("HERITAGE_CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        Self {
            port,
            cors_origin,
            sites_file: env::var_os("HERITAGE_SITES_FILE").map(PathBuf::from),
            boundaries_file: env::var_os("HERITAGE_BOUNDARIES_FILE").map(PathBuf::from),
            enrich_file: env::var_os("HERITAGE_ENRICH_FILE").map(PathBuf::from),
            config_file: env::var_os("HERITAGE_CONFIG").map(PathBuf::from),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Query settings: defaults, then the TOML file if any, then `HERITAGE_*`
    pub fn settings(&self) -> Result<LayeredConfig> {
        let mut settings = LayeredConfig::with_defaults();
        if let Some(path) = &self.config_file {
            settings = settings.load_from_file(path)?;
        }
        let settings = settings.load_from_env();
        settings.validate()?;
        Ok(settings)
    }
}
