//! Gateway request handlers.
//!
//! One submission is one straight-line pass: content-type gate, CSRF
//! policy, rate limit, parse, validate, sanitize, attach server
//! metadata, forward to the workflow webhook, translate the outcome.
//! Every early exit is a typed [`GatewayError`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::http::request::client_identifier;
use crate::http::response::{GatewayError, HealthResponse, ServiceInfo};
use crate::observability::metrics;
use crate::security::{CsrfPolicy, RateDecision, RateLimiter};
use crate::submission::model::{new_contract_id, ForwardedSubmission};
use crate::submission::sanitize::sanitize_value;
use crate::submission::validate::{validate_contract, validate_lead};
use crate::webhook::WebhookClient;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub webhook: Arc<WebhookClient>,
    pub csrf: CsrfPolicy,
    pub client_ip_header: Arc<str>,
}

/// POST /api/contract: the contract intake gateway.
pub async fn submit_contract(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let client_id = client_identifier(&headers, peer, &state.client_ip_header);

    ensure_json_content_type(&headers)?;
    state.csrf.check(header_str(&headers, "x-csrf-token"))?;
    check_rate_limit(&state.limiter, &client_id)?;

    // Everything past the gates runs in its own task: a panic there
    // surfaces as a generic 500 instead of a dropped connection, and a
    // forward already in flight completes even if the caller goes away.
    catch_unexpected(tokio::spawn(process_contract(state, client_id, body)).await)
}

async fn process_contract(
    state: AppState,
    client_id: String,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let raw: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(client = %client_id, error = %e, "Rejecting unparseable body");
        GatewayError::MalformedBody
    })?;

    let submission = validate_contract(&raw).map_err(|errors| {
        tracing::info!(
            client = %client_id,
            violations = errors.len(),
            "Contract payload failed validation"
        );
        GatewayError::Validation(errors)
    })?;

    let outbound = ForwardedSubmission {
        submission: submission.sanitized(),
        submitted_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        submitted_from: client_id.clone(),
    };

    state.webhook.deliver(&outbound).await?;

    let contract_id = new_contract_id();
    metrics::record_submission("accepted");
    tracing::info!(client = %client_id, contract_id = %contract_id, "Contract submission forwarded");

    Ok((
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "contractId": contract_id,
            "message": "Contract submission received successfully",
        })),
    )
        .into_response())
}

/// POST /api/lead: the lighter lead-capture flow.
///
/// Same gates as the contract endpoint, but the payload only needs a
/// well-formed `contact.email`; the rest is forwarded as submitted.
pub async fn submit_lead(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let client_id = client_identifier(&headers, peer, &state.client_ip_header);

    ensure_json_content_type(&headers)?;
    state.csrf.check(header_str(&headers, "x-csrf-token"))?;
    check_rate_limit(&state.limiter, &client_id)?;

    catch_unexpected(tokio::spawn(process_lead(state, client_id, body)).await)
}

async fn process_lead(
    state: AppState,
    client_id: String,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let raw: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(client = %client_id, error = %e, "Rejecting unparseable body");
        GatewayError::MalformedBody
    })?;

    validate_lead(&raw).map_err(GatewayError::Validation)?;

    let mut outbound = sanitize_value(raw);
    if let Value::Object(map) = &mut outbound {
        map.insert(
            "submittedAt".to_string(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        map.insert("submittedFrom".to_string(), json!(client_id.clone()));
    }

    state.webhook.deliver(&outbound).await?;

    metrics::record_submission("accepted");
    tracing::info!(client = %client_id, "Lead submission forwarded");

    Ok((StatusCode::OK, Json(json!({ "ok": true }))).into_response())
}

/// OPTIONS on the API routes. The CORS headers themselves come from the
/// security-headers layer; the preflight just has to answer 204.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// GET /api/contract: static service metadata, no side effects.
pub async fn contract_service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Contract Intake API",
        version: env!("CARGO_PKG_VERSION"),
        methods: &["POST"],
        status: "operational",
    })
}

/// GET /health: liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Collapse a processing task's outcome. A task that died (panicked or
/// was aborted) becomes the generic internal error; nothing past the
/// gates may reach the caller as anything but a JSON envelope.
fn catch_unexpected(
    joined: Result<Result<Response, GatewayError>, tokio::task::JoinError>,
) -> Result<Response, GatewayError> {
    joined.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Submission processing failed unexpectedly");
        Err(GatewayError::Internal)
    })
}

fn ensure_json_content_type(headers: &HeaderMap) -> Result<(), GatewayError> {
    let content_type = header_str(headers, header::CONTENT_TYPE.as_str()).unwrap_or("");
    if content_type.to_ascii_lowercase().contains("application/json") {
        Ok(())
    } else {
        Err(GatewayError::UnsupportedContentType)
    }
}

fn check_rate_limit(limiter: &RateLimiter, client_id: &str) -> Result<(), GatewayError> {
    match limiter.check(client_id) {
        RateDecision::Allowed { remaining } => {
            tracing::debug!(client = %client_id, remaining, "Rate limit check passed");
            Ok(())
        }
        RateDecision::Limited { retry_after } => {
            tracing::warn!(
                client = %client_id,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            Err(GatewayError::RateLimited { retry_after })
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
