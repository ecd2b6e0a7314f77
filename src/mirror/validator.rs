//! Target URL validation against the host allowlist.
//!
//! # Responsibilities
//! - Parse the fully resolved target URL
//! - Require an http/https scheme and an allowlisted host
//! - Treat any parse failure as unsafe
//!
//! # Design Decisions
//! - Runs per request on the concatenated URL, never on a pre-validated
//!   template: the inbound path+query is attacker-controlled and can shift
//!   the effective host (embedded credentials, backslash tricks)
//! - Host comparison is on the url crate's normalized (lowercased) form

use url::Url;

/// Returns true when `url` is permitted to be fetched.
///
/// `allowed_hosts` must already be lowercase; [`crate::mirror::MirrorService`]
/// normalizes the allowlist once at startup.
pub fn is_safe(url: &str, allowed_hosts: &[String]) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    match parsed.host_str() {
        Some(host) => allowed_hosts.iter().any(|allowed| allowed == host),
        None => false,
    }
}
