//! Effective proxy settings.
//!
//! [`ProxyConfig`] is assembled once at startup from CLI flags (see
//! [`RunArgs::proxy_config`](crate::cli::RunArgs::proxy_config)) and
//! checked by [`ProxyConfig::validate`] before the server binds. It is
//! read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Paths the proxy prefix may not shadow.
const RESERVED_PATHS: &[&str] = &["/health"];

/// Whether wildcard target segments still carry their percent-encoding
/// when they reach target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentEncoding {
    /// Segments are exactly as sent on the wire. Decoded once.
    #[default]
    Raw,
    /// A layer in front of us already decoded them. Never decoded again.
    PreDecoded,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyConfig {
    pub prefix: String,
    pub segment_encoding: SegmentEncoding,
    pub timeout_ms: u64,
    pub max_body: usize,
    pub max_response_body: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: "/proxy".to_string(),
            segment_encoding: SegmentEncoding::Raw,
            timeout_ms: 30_000,
            max_body: 1_048_576,
            max_response_body: 10_485_760,
        }
    }
}

impl ProxyConfig {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(message) = validate_prefix(&self.prefix) {
            errors.push(ValidationError {
                field: "prefix".into(),
                message,
                suggestion: Some("use a path such as '/proxy'".into()),
            });
        }

        if self.timeout_ms == 0 {
            errors.push(ValidationError {
                field: "timeout".into(),
                message: "must be greater than zero".into(),
                suggestion: None,
            });
        }

        for (field, value) in [
            ("max_body", self.max_body),
            ("max_response_body", self.max_response_body),
        ] {
            if value == 0 {
                errors.push(ValidationError {
                    field: field.into(),
                    message: "must be greater than zero".into(),
                    suggestion: None,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Validate the mount prefix. Returns `Ok(())` or a human-readable error.
pub fn validate_prefix(prefix: &str) -> Result<(), String> {
    if !prefix.starts_with('/') {
        return Err(format!(
            "prefix must start with '/' (did you mean '/{prefix}'?)"
        ));
    }
    if prefix.len() == 1 || prefix.ends_with('/') {
        return Err("prefix must not be '/' or end with '/'".into());
    }
    if prefix.contains(['{', '}', '*']) {
        return Err("prefix must be a literal path".into());
    }
    if RESERVED_PATHS.contains(&prefix) {
        return Err(format!("prefix '{prefix}' is reserved"));
    }
    Ok(())
}
