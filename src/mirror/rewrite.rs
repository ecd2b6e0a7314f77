//! Response body URL rewriting.
//!
//! # Responsibilities
//! - Pass A: rewrite `href`/`src`/`action` attribute URLs
//! - Pass B: rewrite CSS `url()` references
//! - Classify each candidate as same-origin, foreign, or relative and
//!   repoint same-origin and relative URLs at the mirror's own host
//!
//! # Design Decisions
//! - Targeted pattern substitution over the raw byte stream, not a markup
//!   parser; bodies that are not valid UTF-8 pass through intact
//! - Foreign and protocol-relative URLs are left untouched
//! - Fragment-only and mailto:/tel:/javascript:/data: candidates are left
//!   untouched; rewriting them as relative URLs breaks in-page anchors
//! - Both passes sit behind one type so a structured-parser implementation
//!   could be substituted without touching callers

use regex::bytes::{Captures, Regex};

/// Per-request origins the rewrite rule works against.
///
/// Both are plain origin strings (`scheme://host`, no path), recomputed per
/// request since the mirror may be reachable under multiple hostnames.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    /// Origin of the upstream target URL.
    pub base_origin: String,
    /// Origin the mirror is being accessed as for the current request.
    pub current_origin: String,
}

/// Rewrites HTML attribute URLs and CSS `url()` references in a body.
#[derive(Debug)]
pub struct UrlRewriter {
    attr_re: Regex,
    css_re: Regex,
}

impl UrlRewriter {
    pub fn new() -> Self {
        Self {
            attr_re: Regex::new(r#"(?i)(href|src|action)=["']([^"']*)["']"#)
                .expect("attribute pattern is a valid regex"),
            css_re: Regex::new(r#"(?i)url\(["']?([^)"']+)["']?\)"#)
                .expect("css pattern is a valid regex"),
        }
    }

    /// Rewrite every candidate URL in `body`. Deterministic, no I/O.
    pub fn rewrite(&self, body: &[u8], ctx: &RewriteContext) -> Vec<u8> {
        let pass_a = self.attr_re.replace_all(body, |caps: &Captures| {
            let attr = &caps[1];
            let url = rewrite_candidate(&caps[2], ctx);

            let mut out = Vec::with_capacity(attr.len() + url.len() + 3);
            out.extend_from_slice(attr);
            out.extend_from_slice(b"=\"");
            out.extend_from_slice(&url);
            out.push(b'"');
            out
        });

        let pass_b = self.css_re.replace_all(&pass_a, |caps: &Captures| {
            let url = rewrite_candidate(&caps[1], ctx);

            let mut out = Vec::with_capacity(url.len() + 7);
            out.extend_from_slice(b"url(\"");
            out.extend_from_slice(&url);
            out.extend_from_slice(b"\")");
            out
        });

        pass_b.into_owned()
    }
}

impl Default for UrlRewriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Origin rewrite rule, shared by both passes.
fn rewrite_candidate(candidate: &[u8], ctx: &RewriteContext) -> Vec<u8> {
    if is_exempt(candidate) {
        return candidate.to_vec();
    }

    let base = ctx.base_origin.as_bytes();
    let current = ctx.current_origin.as_bytes();

    if candidate.starts_with(base) {
        // Same origin: swap the prefix, keep path/query/fragment.
        let mut out = current.to_vec();
        out.extend_from_slice(&candidate[base.len()..]);
        out
    } else if candidate.starts_with(b"//") || candidate.starts_with(b"http") {
        // Protocol-relative or foreign absolute: pass through.
        candidate.to_vec()
    } else if candidate.starts_with(b"/") {
        let mut out = current.to_vec();
        out.extend_from_slice(candidate);
        out
    } else {
        let mut out = current.to_vec();
        out.push(b'/');
        out.extend_from_slice(candidate);
        out
    }
}

/// Candidates the relative rule must not touch.
fn is_exempt(candidate: &[u8]) -> bool {
    if candidate.starts_with(b"#") {
        return true;
    }
    const SCHEMES: [&[u8]; 4] = [b"mailto:", b"tel:", b"javascript:", b"data:"];
    SCHEMES.iter().any(|scheme| {
        candidate.len() >= scheme.len() && candidate[..scheme.len()].eq_ignore_ascii_case(scheme)
    })
}
