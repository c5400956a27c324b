//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, client identity)
//!     → handlers.rs (gate → validate → sanitize → forward)
//!     → response.rs (error taxonomy, response envelopes)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::client_identifier;
pub use response::GatewayError;
pub use server::HttpServer;
