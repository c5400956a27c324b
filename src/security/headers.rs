//! Security response headers and the CORS allow-list.
//!
//! # Responsibilities
//! - Add the fixed security headers to every response
//! - Echo CORS headers only for allow-listed origins
//!
//! # Design Decisions
//! - Applied as the outermost middleware layer so even error responses
//!   produced by inner layers carry the headers
//! - Origins match exactly (after trailing-slash normalization); no
//!   wildcard support

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Exact-match origin allow-list.
pub struct CorsPolicy {
    allowed: Vec<String>,
}

impl CorsPolicy {
    pub fn new(origins: &[String]) -> Self {
        Self {
            allowed: origins
                .iter()
                .map(|o| o.trim().trim_end_matches('/').to_string())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// Return the origin to echo back, if it is allow-listed.
    pub fn allow<'a>(&self, origin: Option<&'a str>) -> Option<&'a str> {
        let origin = origin?;
        let normalized = origin.trim_end_matches('/');
        self.allowed
            .iter()
            .any(|allowed| allowed == normalized)
            .then_some(origin)
    }
}

/// Middleware adding security (and, when allowed, CORS) headers to every
/// response.
pub async fn security_headers(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut response = next.run(request).await;
    apply_security_headers(response.headers_mut(), policy.allow(origin.as_deref()));
    response
}

/// The fixed header set every response carries, plus CORS headers for an
/// allow-listed origin.
pub fn apply_security_headers(headers: &mut HeaderMap, allowed_origin: Option<&str>) {
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("x-xss-protection", HeaderValue::from_static("1; mode=block"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if let Some(origin) = allowed_origin {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert("access-control-allow-origin", value);
            headers.insert(
                "access-control-allow-methods",
                HeaderValue::from_static("POST, OPTIONS"),
            );
            headers.insert(
                "access-control-allow-headers",
                HeaderValue::from_static("Content-Type, X-CSRF-Token"),
            );
            headers.insert("access-control-max-age", HeaderValue::from_static("86400"));
        }
    }
}
