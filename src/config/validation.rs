//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the target URL parses and its host is in the allowlist
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: MirrorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use url::Url;

use crate::config::schema::MirrorConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config field the error refers to.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a loaded configuration, collecting every error found.
pub fn validate_config(config: &MirrorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.upstream.target_url) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(err(
                    "upstream.target_url",
                    format!("scheme must be http or https, got {:?}", url.scheme()),
                ));
            }
            match url.host_str() {
                Some(host) => {
                    let allowed = config
                        .upstream
                        .allowed_hosts
                        .iter()
                        .any(|h| h.eq_ignore_ascii_case(host));
                    if !allowed {
                        errors.push(err(
                            "upstream.allowed_hosts",
                            format!("target host {:?} is not in the allowlist", host),
                        ));
                    }
                }
                None => errors.push(err("upstream.target_url", "URL has no host")),
            }
        }
        Err(e) => errors.push(err("upstream.target_url", format!("not a valid URL: {}", e))),
    }

    if config.upstream.allowed_hosts.is_empty() {
        errors.push(err("upstream.allowed_hosts", "allowlist must not be empty"));
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(err("timeouts.upstream_secs", "must be greater than zero"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(err("timeouts.request_secs", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
