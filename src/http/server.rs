//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID,
//!   security headers)
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handlers::{
    contract_service_info, health, preflight, submit_contract, submit_lead, AppState,
};
use crate::http::request::UuidRequestId;
use crate::lifecycle::shutdown;
use crate::security::{headers::security_headers, CorsPolicy, CsrfPolicy, RateLimiter};
use crate::webhook::WebhookClient;

/// HTTP server for the intake gateway.
pub struct HttpServer {
    router: Router,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Build the server from a validated configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        let webhook = Arc::new(WebhookClient::new(&config.webhook)?);
        let cors = Arc::new(CorsPolicy::new(&config.cors.allowed_origins));

        let state = AppState {
            limiter: limiter.clone(),
            webhook,
            csrf: CsrfPolicy::new(config.security.require_csrf_token),
            client_ip_header: config.security.client_ip_header.clone().into(),
        };

        let router = Router::new()
            .route(
                "/api/contract",
                post(submit_contract)
                    .get(contract_service_info)
                    .options(preflight),
            )
            .route("/api/lead", post(submit_lead).options(preflight))
            .route("/health", get(health))
            .with_state(state)
            // Router::layer wraps outside-in: later layers run first. The
            // request ID is set before tracing or propagation see it, and
            // the security headers cover every response, including errors
            // produced by inner layers.
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(middleware::from_fn_with_state(cors, security_headers));

        Ok(Self { router, limiter })
    }

    /// The limiter, for the sweep task.
    pub fn limiter(&self) -> Arc<RateLimiter> {
        self.limiter.clone()
    }

    /// Run the server until shutdown, accepting connections on `listener`.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
