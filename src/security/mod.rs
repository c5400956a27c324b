//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (security response headers, CORS allow-list)
//!     → csrf.rs (token policy for submissions)
//!     → rate_limit.rs (per-client fixed-window limits)
//!     → Pass to the gateway handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in client input: the CSRF token and `_meta` block are
//!   advisory, the client address comes from a configured trusted header
//! - Rate-limit state is per-process; under horizontal scale-out the
//!   limits apply per instance, not globally

pub mod csrf;
pub mod headers;
pub mod rate_limit;

pub use csrf::CsrfPolicy;
pub use headers::CorsPolicy;
pub use rate_limit::{RateDecision, RateLimiter};
