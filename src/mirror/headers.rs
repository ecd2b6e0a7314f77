//! Inbound-to-outbound header translation.
//!
//! # Responsibilities
//! - Drop headers that identify the mirror (`Host`, `Origin`, `Referer`)
//! - Drop `Accept-Encoding`/`TE` so the upstream replies with an identity
//!   body the rewriter can read
//! - Forward every other header unchanged, duplicates preserved in order
//! - Pin the outbound `User-Agent` (inbound value, else fixed fallback)
//!
//! # Design Decisions
//! - Pure translation, no I/O
//! - Leaking the mirror's hostname upstream triggers virtual-host
//!   mismatches and CORS rejections; everything else (cookies, accept
//!   headers, custom headers) is needed for functional parity
//! - A compressed upstream body would pass through the rewriter opaque
//!   and reach the client mislabeled; requesting identity encoding keeps
//!   the body rewritable

use axum::http::header::{ACCEPT_ENCODING, HOST, ORIGIN, REFERER, TE, USER_AGENT};
use axum::http::{HeaderMap, HeaderValue};

/// Build the outbound header set for the upstream request.
///
/// Header names in [`HeaderMap`] are case-normalized, so the drop list
/// matches any inbound casing.
pub fn translate(inbound: &HeaderMap, user_agent_fallback: &str) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len());

    for (name, value) in inbound.iter() {
        if *name == HOST || *name == ORIGIN || *name == REFERER {
            continue;
        }
        if *name == ACCEPT_ENCODING || *name == TE {
            continue;
        }
        outbound.append(name.clone(), value.clone());
    }

    if !outbound.contains_key(USER_AGENT) {
        if let Ok(fallback) = HeaderValue::from_str(user_agent_fallback) {
            outbound.insert(USER_AGENT, fallback);
        }
    }

    outbound
}
