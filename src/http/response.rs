//! Outcome-to-response mapping.
//!
//! # Responsibilities
//! - Map the core's outcome to a wire response (200 / 403 / 502)
//! - Propagate the upstream Content-Type on success
//! - Serve fixed bodies for the failure outcomes
//!
//! # Design Decisions
//! - Success is always 200; the mirror never relays upstream status codes
//! - Failure bodies are fixed strings, never partial upstream bytes

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::mirror::{MirrorError, MirrorResponse};

/// Body served on allowlist rejection.
pub const FORBIDDEN_BODY: &str = "Access denied";

/// Body served on upstream transport failure.
pub const UPSTREAM_UNAVAILABLE_BODY: &str = "Failed to fetch content from the target site";

/// Convert a core outcome into the client-facing response.
pub fn outcome_response(result: Result<MirrorResponse, MirrorError>) -> Response {
    match result {
        Ok(mirrored) => {
            let mut response = Response::new(Body::from(mirrored.body));
            if let Some(content_type) = mirrored.content_type {
                response.headers_mut().insert(CONTENT_TYPE, content_type);
            }
            response
        }
        Err(MirrorError::Forbidden { .. }) => {
            (StatusCode::FORBIDDEN, FORBIDDEN_BODY).into_response()
        }
        Err(MirrorError::UpstreamUnavailable { .. }) => {
            (StatusCode::BAD_GATEWAY, UPSTREAM_UNAVAILABLE_BODY).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_success_maps_to_200_with_content_type() {
        let response = outcome_response(Ok(MirrorResponse {
            body: b"<html></html>".to_vec(),
            content_type: Some(HeaderValue::from_static("text/html; charset=utf-8")),
        }));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let response = outcome_response(Err(MirrorError::Forbidden {
            target: "https://evil.example/".to_string(),
        }));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
