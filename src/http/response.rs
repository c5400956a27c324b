//! Response envelopes and the gateway error taxonomy.
//!
//! # Responsibilities
//! - Map every failure to a JSON error envelope and HTTP status
//! - Keep internal detail out of client-facing messages
//!
//! # Design Decisions
//! - Validation is the only error that reports multiple problems;
//!   everything else is a single top-level error
//! - Rate-limit denials carry a Retry-After header with the window reset
//! - Upstream failures reach the caller as a generic 502; the raw
//!   upstream text only goes to the server log

use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::observability::metrics;
use crate::security::csrf::CsrfRejection;
use crate::submission::validate::FieldError;
use crate::webhook::WebhookError;

/// Everything that can terminate a submission request early.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unsupported content type")]
    UnsupportedContentType,

    #[error("{0}")]
    Csrf(#[from] CsrfRejection),

    #[error("rate limit exceeded")]
    RateLimited { retry_after: Duration },

    #[error("malformed request body")]
    MalformedBody,

    #[error("payload validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Upstream(#[from] WebhookError),

    #[error("internal error")]
    Internal,
}

impl GatewayError {
    fn outcome(&self) -> &'static str {
        match self {
            GatewayError::UnsupportedContentType => "unsupported_media",
            GatewayError::Csrf(_) => "csrf_rejected",
            GatewayError::RateLimited { .. } => "rate_limited",
            GatewayError::MalformedBody => "malformed",
            GatewayError::Validation(_) => "invalid",
            GatewayError::Upstream(_) => "upstream_error",
            GatewayError::Internal => "internal_error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        metrics::record_submission(self.outcome());

        match self {
            GatewayError::UnsupportedContentType => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "ok": false,
                    "message": "Invalid Content-Type. Must be application/json.",
                })),
            )
                .into_response(),

            GatewayError::Csrf(rejection) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "message": rejection.to_string() })),
            )
                .into_response(),

            GatewayError::RateLimited { retry_after } => {
                metrics::record_rate_limited();
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after.as_secs().to_string())],
                    Json(json!({
                        "ok": false,
                        "error": "Rate limit exceeded. Please try again later.",
                    })),
                )
                    .into_response()
            }

            GatewayError::MalformedBody => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "error": "Malformed JSON body" })),
            )
                .into_response(),

            GatewayError::Validation(errors) => {
                let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "ok": false,
                        "error": "Payload validation failed",
                        "details": details,
                    })),
                )
                    .into_response()
            }

            GatewayError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "ok": false,
                    "error": "Failed to process contract submission",
                    "detail": "Please try again or contact support",
                })),
            )
                .into_response(),

            GatewayError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

/// Static service metadata for the read-only GET endpoint.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub methods: &'static [&'static str],
    pub status: &'static str,
}

/// Health probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}
