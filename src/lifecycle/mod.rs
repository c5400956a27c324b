//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Initialize subsystems → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal or trigger → Stop accepting → Drain in-flight → Exit
//! ```
//!
//! # Design Decisions
//! - Shutdown is a broadcast: the server and background tasks each hold
//!   a receiver and stop independently
//! - Ctrl-C and programmatic triggers go through the same channel

pub mod shutdown;

pub use shutdown::Shutdown;
