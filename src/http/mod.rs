//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, InboundRequest extraction)
//!     → [mirror core validates, fetches, rewrites]
//!     → response.rs (outcome → status, fixed failure bodies)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{FORBIDDEN_BODY, UPSTREAM_UNAVAILABLE_BODY};
pub use server::MirrorServer;
