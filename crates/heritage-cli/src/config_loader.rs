//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use heritage_core::config::{parse_envelope, CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "heritage.toml";

/// The config file to read, if any
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.exists().then_some(local)
        }
    }
}

/// Overrides taken from global flags
pub fn cli_overrides(cli: &Cli) -> Result<CliConfigOverrides> {
    let envelope = cli
        .envelope
        .as_deref()
        .map(parse_envelope)
        .transpose()
        .context("Invalid --envelope")?;

    Ok(CliConfigOverrides {
        envelope,
        boundary_crs: cli.boundary_crs,
        site_crs: cli.site_crs,
        query_timeout_ms: cli.timeout_ms,
    })
}

/// Defaults, then file, then environment, then flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(cli.config.as_deref()) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli_overrides(cli)?);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
