//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, OriginMode};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

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

/// Load and validate configuration from a TOML file, without environment overrides.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = read_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration from an optional TOML file, overlay the process environment, validate.
pub fn load(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    load_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load`] with an explicit variable lookup.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_env(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`. Empty values count as unset.
pub fn apply_env<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        config.listener.port = port.trim().parse().map_err(|e| ConfigError::Env {
            var: "PORT",
            message: format!("{}", e),
        })?;
    }

    if let Some(key) = get("ACCESS_KEY") {
        config.access.access_key = key;
    }
    if let Some(flag) = get("ACCESS_VERIFY_ORIGIN") {
        config.access.verify_origin = parse_bool("ACCESS_VERIFY_ORIGIN", &flag)?;
    }

    if let Some(mode) = get("ORIGIN_POLICY") {
        let mode: OriginMode = mode.parse().map_err(|message| ConfigError::Env {
            var: "ORIGIN_POLICY",
            message,
        })?;
        config.cors.mode = Some(mode);
    }
    if let Some(origins) = get("ALLOWED_ORIGINS") {
        config.cors.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(flag) = get("CORS_CREDENTIALS") {
        config.cors.allow_credentials = Some(parse_bool("CORS_CREDENTIALS", &flag)?);
    }

    if let Some(env) = get("NODE_ENV") {
        config.transport.production = env.trim() == "production";
    }
    if let Some(flag) = get("HTTPS_REDIRECT") {
        config.transport.enforce_https = Some(parse_bool("HTTPS_REDIRECT", &flag)?);
    }

    if let Some(key) = get("TMDB_API_KEY") {
        config.upstream.api_key = key;
    }
    if let Some(url) = get("TMDB_BASE_URL") {
        config.upstream.base_url = url;
    }

    if let Some(addr) = get("METRICS_ADDRESS") {
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = addr;
    }

    Ok(())
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Env {
            var,
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}
