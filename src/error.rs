//! Unified error types for Corsair.
//!
//! Defines [`CorsairError`] (process-level failures surfaced by the CLI),
//! [`ValidationError`] for startup config failures, and [`ProxyError`],
//! the two ways a single relayed request can fail. All use `thiserror`
//! for `Display` and `Error` derives.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::proxy::headers::apply_cors;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CorsairError {
    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

/// Why a relayed request did not produce an upstream response.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The reconstructed target does not start with `http`.
    #[error("Invalid target URL")]
    InvalidTarget,

    /// Anything that went wrong contacting the target or reading its reply.
    #[error("Bad Gateway")]
    Upstream {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ProxyError {
    pub fn upstream(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Upstream {
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidTarget => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Human-readable cause chain of an upstream failure, `None` otherwise.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        let Self::Upstream { source } = self else {
            return None;
        };
        let mut details = source.to_string();
        let mut cause = source.source();
        while let Some(inner) = cause {
            details.push_str(": ");
            details.push_str(&inner.to_string());
            cause = inner.source();
        }
        Some(details)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        let mut response = (self.status(), Json(body)).into_response();
        apply_cors(response.headers_mut());
        response
    }
}
