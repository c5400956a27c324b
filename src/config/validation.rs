//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check addresses, URLs and origins actually parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("listener.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("webhook.url is required")]
    MissingWebhookUrl,

    #[error("webhook.url {0:?} is not a valid http(s) URL")]
    InvalidWebhookUrl(String),

    #[error("webhook.secret must be set")]
    MissingWebhookSecret,

    #[error("webhook.secret_header {0:?} is not a valid header name")]
    InvalidSecretHeader(String),

    #[error("webhook.timeout_secs must be greater than zero")]
    ZeroWebhookTimeout,

    #[error("cors.allowed_origins entry {0:?} is not a valid origin")]
    InvalidOrigin(String),

    #[error("rate_limit.max_requests must be greater than zero")]
    ZeroRateLimit,

    #[error("rate_limit.window_secs must be greater than zero")]
    ZeroRateWindow,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.webhook.url.is_empty() {
        errors.push(ValidationError::MissingWebhookUrl);
    } else if !is_http_url(&config.webhook.url) {
        errors.push(ValidationError::InvalidWebhookUrl(config.webhook.url.clone()));
    }
    if config.webhook.secret.is_empty() {
        errors.push(ValidationError::MissingWebhookSecret);
    }
    if !is_header_name(&config.webhook.secret_header) {
        errors.push(ValidationError::InvalidSecretHeader(
            config.webhook.secret_header.clone(),
        ));
    }
    if config.webhook.timeout_secs == 0 {
        errors.push(ValidationError::ZeroWebhookTimeout);
    }

    for origin in &config.cors.allowed_origins {
        if !is_origin(origin) {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::ZeroRateLimit);
    }
    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::ZeroRateWindow);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// An allow-list entry must be a bare origin: scheme://host[:port].
fn is_origin(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some()
                && url.path() == "/"
                && url.query().is_none()
                && url.fragment().is_none()
        }
        Err(_) => false,
    }
}

fn is_header_name(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
