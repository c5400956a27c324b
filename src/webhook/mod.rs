//! Outbound delivery to the workflow webhook.
//!
//! The webhook itself is a black box: this subsystem only delivers the
//! processed payload, authenticates with the shared secret, and reports
//! whether delivery succeeded.

pub mod client;

pub use client::{WebhookClient, WebhookError};
