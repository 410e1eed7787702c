//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::gateway::target::trim_origin;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values that take precedence over the config file (CLI flags, `API_ORIGIN`).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub upstream_origin: Option<String>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}

/// Parse a TOML file into a config without validating it.
pub fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    finalize(read_config_file(path)?)
}

/// Build the effective configuration: defaults, then the optional file, then overrides.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(origin) = overrides.upstream_origin {
        config.upstream.origin = origin;
    }
    if let Some(bind_address) = overrides.bind_address {
        config.listener.bind_address = bind_address;
    }
    if let Some(log_level) = overrides.log_level {
        config.observability.log_level = log_level;
    }

    finalize(config)
}

fn finalize(mut config: GatewayConfig) -> Result<GatewayConfig, ConfigError> {
    config.upstream.origin = trim_origin(&config.upstream.origin).to_string();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
