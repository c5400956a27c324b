//! HTTP client for the workflow webhook.
//!
//! # Responsibilities
//! - POST the forwarded payload as JSON with the shared-secret header
//! - Bound the round trip with a timeout
//! - Map transport failures and non-success statuses to typed errors
//!
//! # Design Decisions
//! - Upstream response bodies are truncated and logged, never echoed
//!   verbatim to the caller
//! - A slow webhook must not hold request tasks: the client-level
//!   timeout covers connect, write and read

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::config::WebhookConfig;
use crate::observability::metrics;

/// How much upstream error body is kept for the server-side log.
const DETAIL_LIMIT: usize = 200;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook returned status {status}")]
    Status { status: u16, detail: String },
}

/// Client for one configured webhook target.
pub struct WebhookClient {
    client: reqwest::Client,
    url: String,
    secret: String,
    secret_header: String,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            secret: config.secret.clone(),
            secret_header: config.secret_header.clone(),
        })
    }

    /// Deliver one payload. Success means the webhook answered 2xx.
    pub async fn deliver<T: Serialize + ?Sized>(&self, payload: &T) -> Result<(), WebhookError> {
        let started = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .header(self.secret_header.as_str(), self.secret.as_str())
            .json(payload)
            .send()
            .await?;
        metrics::record_webhook_duration(started.elapsed());

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "webhook accepted payload");
            return Ok(());
        }

        let detail: String = response
            .text()
            .await
            .unwrap_or_else(|_| "unreadable body".to_string())
            .chars()
            .take(DETAIL_LIMIT)
            .collect();
        tracing::error!(
            status = status.as_u16(),
            detail = %detail,
            "webhook rejected payload"
        );
        Err(WebhookError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}
