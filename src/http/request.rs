//! Request identity.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4) for tracing
//! - Resolve the client identifier used for rate limiting and metadata
//!
//! # Design Decisions
//! - The client address is read from the configured trusted header
//!   (set by the fronting proxy/CDN), then `x-forwarded-for`, then the
//!   socket peer. When the service is reachable without that proxy the
//!   header is spoofable; deploying behind the proxy is assumed.

use std::net::SocketAddr;

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// `MakeRequestId` implementation producing UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Resolve the client identifier for one request.
pub fn client_identifier(headers: &HeaderMap, peer: SocketAddr, trusted_header: &str) -> String {
    for name in [trusted_header, "x-forwarded-for"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            // x-forwarded-for may carry a hop list; the first entry is
            // the original client
            let first = value.split(',').next().unwrap_or("").trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    peer.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        "192.0.2.1:40000".parse().unwrap()
    }

    #[test]
    fn prefers_trusted_header() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", "203.0.113.9".parse().unwrap());
        headers.insert("x-forwarded-for", "198.51.100.7".parse().unwrap());

        assert_eq!(
            client_identifier(&headers, peer(), "cf-connecting-ip"),
            "203.0.113.9"
        );
    }

    #[test]
    fn falls_back_to_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "198.51.100.7, 10.0.0.1".parse().unwrap(),
        );

        assert_eq!(
            client_identifier(&headers, peer(), "cf-connecting-ip"),
            "198.51.100.7"
        );
    }

    #[test]
    fn falls_back_to_peer_address() {
        let headers = HeaderMap::new();
        assert_eq!(
            client_identifier(&headers, peer(), "cf-connecting-ip"),
            "192.0.2.1"
        );
    }

    #[test]
    fn request_ids_are_unique() {
        let mut maker = UuidRequestId;
        let req = Request::builder().body(()).unwrap();
        let a = maker.make_request_id(&req).unwrap();
        let b = maker.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
