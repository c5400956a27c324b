//! Configuration loading from disk and the environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
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
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration.
///
/// Starts from the TOML file when one is given (defaults otherwise), then
/// applies environment overrides for the deployment-sensitive values.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config: GatewayConfig = match path {
        Some(p) => toml::from_str(&fs::read_to_string(p)?)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Environment overrides, matching the names the form deployments use.
fn apply_env_overrides(config: &mut GatewayConfig) {
    if let Ok(v) = env::var("BIND_ADDR") {
        config.listener.bind_address = v;
    }
    if let Ok(v) = env::var("WEBHOOK_URL") {
        config.webhook.url = v;
    }
    if let Ok(v) = env::var("WEBHOOK_SECRET") {
        config.webhook.secret = v;
    }
    if let Ok(v) = env::var("ALLOWED_ORIGINS") {
        config.cors.allowed_origins = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Ok(v) = env::var("MAX_REQUESTS_PER_WINDOW") {
        if let Ok(n) = v.parse() {
            config.rate_limit.max_requests = n;
        }
    }
}
