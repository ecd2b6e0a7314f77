//! Mirroring core subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → build target URL (target_url + path+query)
//!     → validator.rs (allowlist + scheme check, runs every request)
//!     → headers.rs (drop Host/Origin/Referer, pin User-Agent)
//!     → fetcher.rs (single upstream attempt, bounded timeout)
//!     → rewrite.rs (repoint URLs at the mirror's own origin)
//!     → MirrorResponse
//! ```
//!
//! # Design Decisions
//! - Every value here is request-scoped; the only shared state is the
//!   immutable config snapshot and the pooled upstream client
//! - The fetcher is unreachable when validation rejects
//! - Failures never escape as panics; they map to the two user-visible
//!   outcomes (Forbidden, UpstreamUnavailable)

pub mod fetcher;
pub mod headers;
pub mod rewrite;
pub mod validator;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, Method};
use bytes::Bytes;
use thiserror::Error;
use url::Url;

use crate::config::MirrorConfig;
pub use fetcher::{UpstreamFetcher, UpstreamResponse};
pub use rewrite::{RewriteContext, UrlRewriter};

/// An inbound request as handed over by the HTTP listener.
#[derive(Debug)]
pub struct InboundRequest {
    pub method: Method,
    /// Path and query exactly as received, leading slash included.
    pub path_query: String,
    pub headers: HeaderMap,
    /// Present only for methods that carried a payload.
    pub body: Option<Bytes>,
    /// Scheme the client used to reach the mirror.
    pub scheme: String,
    /// Host the client used to reach the mirror.
    pub host: String,
}

/// Rewritten response handed back to the listener.
#[derive(Debug)]
pub struct MirrorResponse {
    pub body: Vec<u8>,
    /// Upstream Content-Type, propagated so mirrored CSS and images stay
    /// usable.
    pub content_type: Option<HeaderValue>,
}

/// User-visible failure outcomes. The listener maps these to 403 and 502.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Target URL failed allowlist validation, or the request was
    /// malformed enough that we fail closed.
    #[error("access to {target} denied")]
    Forbidden { target: String },

    /// Transport failure talking to the upstream.
    #[error("upstream fetch of {target} failed")]
    UpstreamUnavailable {
        target: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors constructing the service at startup.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid target URL: {0}")]
    TargetUrl(#[from] url::ParseError),
    #[error("target URL has no host")]
    MissingHost,
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The request-forwarding and content-rewriting core.
///
/// Built once at startup from the validated config; each call to
/// [`MirrorService::handle`] is independent.
#[derive(Debug)]
pub struct MirrorService {
    target_url: String,
    base_origin: String,
    allowed_hosts: Vec<String>,
    user_agent_fallback: String,
    fetcher: UpstreamFetcher,
    rewriter: UrlRewriter,
}

impl MirrorService {
    pub fn new(config: &MirrorConfig) -> Result<Self, BuildError> {
        let target = Url::parse(&config.upstream.target_url)?;
        let host = target.host_str().ok_or(BuildError::MissingHost)?;
        // An explicit port is part of the origin the upstream emits in its
        // own absolute links.
        let base_origin = match target.port() {
            Some(port) => format!("{}://{}:{}", target.scheme(), host, port),
            None => format!("{}://{}", target.scheme(), host),
        };

        // Normalized once so the per-request check is an exact match.
        let allowed_hosts = config
            .upstream
            .allowed_hosts
            .iter()
            .map(|h| h.to_ascii_lowercase())
            .collect();

        let fetcher = UpstreamFetcher::new(&config.upstream, &config.timeouts)?;

        Ok(Self {
            target_url: config.upstream.target_url.trim_end_matches('/').to_string(),
            base_origin,
            allowed_hosts,
            user_agent_fallback: config.upstream.user_agent_fallback.clone(),
            fetcher,
            rewriter: UrlRewriter::new(),
        })
    }

    /// Origin of the upstream target (`scheme://host`).
    pub fn base_origin(&self) -> &str {
        &self.base_origin
    }

    /// Forward one inbound request and rewrite the response body.
    pub async fn handle(&self, request: InboundRequest) -> Result<MirrorResponse, MirrorError> {
        let target = format!("{}{}", self.target_url, request.path_query);

        // Re-validated on every request: path+query is attacker-controlled.
        if !validator::is_safe(&target, &self.allowed_hosts) {
            return Err(MirrorError::Forbidden { target });
        }

        let outbound = headers::translate(&request.headers, &self.user_agent_fallback);

        let upstream = self
            .fetcher
            .fetch(&target, request.method, outbound, request.body)
            .await
            .map_err(|source| MirrorError::UpstreamUnavailable {
                target: target.clone(),
                source,
            })?;

        let ctx = RewriteContext {
            base_origin: self.base_origin.clone(),
            current_origin: format!("{}://{}", request.scheme, request.host),
        };
        let body = self.rewriter.rewrite(&upstream.body, &ctx);
        let content_type = upstream.headers.get(CONTENT_TYPE).cloned();

        Ok(MirrorResponse { body, content_type })
    }
}
