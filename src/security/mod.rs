//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response (any outcome):
//!     → headers.rs (strip Server/X-Powered-By, set hardening headers)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Fail closed: malformed requests are denied, not forwarded
//! - No trust in client input

pub mod headers;

pub use headers::{sanitize, sanitize_middleware};
