//! Configuration validation.
//!
//! Validation is a pure function `GatewayConfig → Result<(), Vec<ValidationError>>`
//! and reports every problem it finds, not just the first.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream.origin `{origin}` is not an absolute http(s) URL: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("upstream.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("upstream.mount `{0}` must start with '/'")]
    InvalidMount(String),

    #[error("upstream.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("{field} `{value}` is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check a config for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(reason) = check_origin(&config.upstream.origin) {
        errors.push(ValidationError::InvalidOrigin {
            origin: config.upstream.origin.clone(),
            reason,
        });
    }

    if config.upstream.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if !config.upstream.mount.starts_with('/') {
        errors.push(ValidationError::InvalidMount(config.upstream.mount.clone()));
    }

    if config.upstream.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin(origin: &str) -> Result<(), String> {
    let url = Url::parse(origin).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme `{}`", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
