//! Single-Upstream Website Mirror Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod mirror;
pub mod security;

pub use config::MirrorConfig;
pub use http::MirrorServer;
pub use lifecycle::Shutdown;
pub use mirror::{MirrorError, MirrorService};
