//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the mirror.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the mirror.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MirrorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream target and allowlist.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Full upstream URL the mirror re-serves: scheme and host plus an
    /// optional base path (e.g., "https://bou1er.ru/sravnicar").
    /// The inbound path+query is appended to this verbatim.
    pub target_url: String,

    /// Hostnames permitted as fetch targets. The target URL's host must be
    /// a member; validation enforces this at load time.
    pub allowed_hosts: Vec<String>,

    /// User-Agent sent upstream when the client did not supply one.
    pub user_agent_fallback: String,

    /// Skip verification of the upstream TLS certificate chain and
    /// hostname. The mirrored site may sit behind a self-signed or
    /// mismatched certificate; integrators who control the upstream
    /// certificate should turn this off.
    pub insecure_skip_tls_verify: bool,

    /// Maximum redirect hops followed before the fetch counts as failed.
    pub max_redirects: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            target_url: "https://bou1er.ru/sravnicar".to_string(),
            allowed_hosts: vec!["bou1er.ru".to_string(), "localhost".to_string()],
            user_agent_fallback: "MirrorBot/1.0".to_string(),
            insecure_skip_tls_verify: true,
            max_redirects: 5,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream fetch timeout in seconds: total time for the full
    /// request/response cycle, redirects included.
    pub upstream_secs: u64,

    /// Inbound request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_secs: 30,
            request_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
