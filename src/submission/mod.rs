//! Submission handling subsystem.
//!
//! # Data Flow
//! ```text
//! parsed JSON body
//!     → validate.rs (structural checks, collect-all field errors)
//!     → model.rs (typed, immutable ContractSubmission)
//!     → sanitize.rs (neutralize markup in string content)
//!     → [gateway attaches server metadata and forwards]
//! ```
//!
//! # Design Decisions
//! - Validation is structural only; business checks (RUT checksums,
//!   region/city consistency) belong to the downstream workflow
//! - A submission is immutable once built; sanitization consumes and
//!   returns a new value
//! - Wire field names match the public form contract exactly

pub mod model;
pub mod sanitize;
pub mod validate;

pub use model::{ContractSubmission, ContractType, ForwardedSubmission};
pub use validate::{validate_contract, validate_lead, FieldError};
