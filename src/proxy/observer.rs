//! Phase-boundary hook for the forwarder.
//!
//! A [`RelayObserver`] is told when a target has been resolved, when the
//! outbound request is about to be issued, when the upstream response has
//! been relayed, and when a request was rejected. Callbacks are synchronous
//! and must not block; they only observe. [`TracingObserver`] is the
//! default and turns each boundary into a `tracing` event.

use axum::http::{Method, StatusCode};

use crate::error::ProxyError;

/// Per-request context passed to every callback.
#[derive(Debug, Clone, Copy)]
pub struct RelayContext<'a> {
    pub correlation_id: &'a str,
    pub method: &'a Method,
}

pub trait RelayObserver: Send + Sync {
    fn target_resolved(&self, _ctx: RelayContext<'_>, _target: &str) {}

    fn outbound_issued(&self, _ctx: RelayContext<'_>, _target: &str) {}

    fn response_relayed(&self, _ctx: RelayContext<'_>, _status: StatusCode, _latency_ms: u64) {}

    fn request_rejected(&self, _ctx: RelayContext<'_>, _error: &ProxyError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RelayObserver for TracingObserver {
    fn target_resolved(&self, ctx: RelayContext<'_>, target: &str) {
        tracing::debug!(
            correlation_id = %ctx.correlation_id,
            method = %ctx.method,
            target = %target,
            "target resolved"
        );
    }

    fn outbound_issued(&self, ctx: RelayContext<'_>, target: &str) {
        tracing::info!(
            correlation_id = %ctx.correlation_id,
            method = %ctx.method,
            target = %target,
            "forwarding request"
        );
    }

    fn response_relayed(&self, ctx: RelayContext<'_>, status: StatusCode, latency_ms: u64) {
        tracing::info!(
            correlation_id = %ctx.correlation_id,
            method = %ctx.method,
            status = status.as_u16(),
            latency_ms,
            "upstream responded"
        );
    }

    fn request_rejected(&self, ctx: RelayContext<'_>, error: &ProxyError) {
        match error {
            ProxyError::InvalidTarget => tracing::warn!(
                correlation_id = %ctx.correlation_id,
                method = %ctx.method,
                "invalid target URL"
            ),
            ProxyError::Upstream { .. } => tracing::error!(
                correlation_id = %ctx.correlation_id,
                method = %ctx.method,
                error = %error.details().unwrap_or_default(),
                "upstream request failed"
            ),
        }
    }
}
