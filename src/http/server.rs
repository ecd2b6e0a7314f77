//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all mirror handler
//! - Wire up middleware (tracing, timeout, request ID, header sanitizer)
//! - Extract the InboundRequest the core consumes
//! - Map core outcomes to wire responses

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header::HOST, Request},
    middleware,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::MirrorConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::outcome_response;
use crate::mirror::{BuildError, InboundRequest, MirrorError, MirrorService};
use crate::security::sanitize_middleware;

/// Largest inbound body the mirror will buffer and forward.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MirrorService>,
}

/// HTTP server for the mirror.
pub struct MirrorServer {
    router: Router,
    config: MirrorConfig,
}

impl MirrorServer {
    /// Create a new server from a validated configuration.
    pub fn new(config: MirrorConfig) -> Result<Self, BuildError> {
        let service = Arc::new(MirrorService::new(&config)?);
        let state = AppState { service };
        let router = Self::build_router(&config, state);

        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &MirrorConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(mirror_handler))
            .route("/", any(mirror_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(middleware::from_fn(sanitize_middleware))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }
}

/// Main mirror handler: extract, forward, rewrite, respond.
async fn mirror_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (parts, body) = request.into_parts();

    let path_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        path = %path_query,
        "Mirroring request"
    );

    // The host the client used decides the rewrite target. A request
    // without one cannot be rewritten coherently; fail closed.
    let host = parts
        .headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| parts.uri.authority().map(|a| a.to_string()));
    let Some(host) = host else {
        tracing::warn!(request_id = %request_id, "Request without host denied");
        return outcome_response(Err(MirrorError::Forbidden {
            target: path_query,
        }));
    };

    let scheme = parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .or_else(|| parts.uri.scheme_str())
        .unwrap_or("http")
        .to_string();

    // Oversized or broken bodies are denied, never half-forwarded.
    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => (!bytes.is_empty()).then_some(bytes),
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            return outcome_response(Err(MirrorError::Forbidden {
                target: path_query,
            }));
        }
    };

    let inbound = InboundRequest {
        method: parts.method,
        path_query,
        headers: parts.headers,
        body,
        scheme,
        host,
    };

    let result = state.service.handle(inbound).await;
    match &result {
        Ok(mirrored) => {
            tracing::debug!(
                request_id = %request_id,
                bytes = mirrored.body.len(),
                "Mirrored response ready"
            );
        }
        Err(MirrorError::Forbidden { target }) => {
            tracing::warn!(request_id = %request_id, target = %target, "Target rejected by allowlist");
        }
        Err(MirrorError::UpstreamUnavailable { target, source }) => {
            tracing::error!(request_id = %request_id, target = %target, error = %source, "Upstream fetch failed");
        }
    }

    outcome_response(result)
}
