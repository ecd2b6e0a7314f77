//! Outbound upstream fetch.
//!
//! # Responsibilities
//! - Issue the single outbound HTTP(S) request per inbound request
//! - Apply the configured total timeout and redirect limit
//! - Attach the body only when the inbound request carried one
//!
//! # Design Decisions
//! - One attempt, no retries or backoff: a failed fetch surfaces
//!   immediately as a transport failure with no partial body
//! - TLS verification against the upstream is disabled by default
//!   (config flag `insecure_skip_tls_verify`); the mirrored deployment
//!   sits behind a mismatched certificate
//! - One pooled client for the process; requests share nothing else

use std::time::Duration;

use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use reqwest::redirect::Policy;

use crate::config::schema::{TimeoutConfig, UpstreamConfig};

/// Raw upstream response. Created per request, consumed by the rewriter,
/// discarded once the response is sent.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Upstream HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct UpstreamFetcher {
    client: reqwest::Client,
}

impl UpstreamFetcher {
    /// Build the process-wide client from config.
    pub fn new(
        upstream: &UpstreamConfig,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .redirect(Policy::limited(upstream.max_redirects))
            .danger_accept_invalid_certs(upstream.insecure_skip_tls_verify)
            .danger_accept_invalid_hostnames(upstream.insecure_skip_tls_verify)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` with the translated headers and optional body.
    ///
    /// Any network-level failure (refused connection, timeout, TLS
    /// handshake, redirect limit) comes back as `Err`; the caller maps it
    /// to the fixed upstream-unavailable outcome.
    pub async fn fetch(
        &self,
        url: &str,
        method: Method,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<UpstreamResponse, reqwest::Error> {
        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
