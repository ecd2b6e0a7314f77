//! Response header sanitization.
//!
//! # Responsibilities
//! - Strip headers that reveal the serving stack (`Server`, `X-Powered-By`)
//! - Set the fixed hardening headers on every response
//!
//! # Design Decisions
//! - Applied as a middleware layer so it runs exactly once per response,
//!   error responses included
//! - Hardening headers are unconditional, not configurable

use axum::body::Body;
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, SERVER};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

const X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");
const X_CONTENT_TYPE_OPTIONS: HeaderName = HeaderName::from_static("x-content-type-options");
const X_FRAME_OPTIONS: HeaderName = HeaderName::from_static("x-frame-options");
const X_XSS_PROTECTION: HeaderName = HeaderName::from_static("x-xss-protection");

/// Strip identifying headers and set the hardening set.
pub fn sanitize(headers: &mut HeaderMap) {
    headers.remove(X_POWERED_BY);
    headers.remove(SERVER);

    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));
}

/// Middleware wrapper around [`sanitize`]; runs after the body is
/// finalized, success and failure alike.
pub async fn sanitize_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    sanitize(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifying_headers_removed() {
        let mut headers = HeaderMap::new();
        headers.insert(SERVER, HeaderValue::from_static("nginx/1.24"));
        headers.insert(X_POWERED_BY, HeaderValue::from_static("PHP/8.2"));

        sanitize(&mut headers);

        assert!(!headers.contains_key(SERVER));
        assert!(!headers.contains_key(X_POWERED_BY));
    }

    #[test]
    fn test_hardening_headers_set() {
        let mut headers = HeaderMap::new();
        sanitize(&mut headers);

        assert_eq!(headers.get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "SAMEORIGIN");
        assert_eq!(headers.get(X_XSS_PROTECTION).unwrap(), "1; mode=block");
    }

    #[test]
    fn test_existing_values_overwritten() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

        sanitize(&mut headers);
        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "SAMEORIGIN");
    }
}
