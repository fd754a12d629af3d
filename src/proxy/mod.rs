//! The forwarder.
//!
//! [`forward_handler`] is mounted on `{prefix}/{*target}` for every
//! method. A request moves through three phases and stops at the first
//! failure: target resolution ([`target`]), request relay ([`upstream`])
//! and response relay ([`response`]). OPTIONS preflights are answered
//! before any of them. Header rules live in [`headers`]; phase boundaries
//! are reported to the configured [`observer`].

pub mod headers;
pub mod observer;
pub mod response;
pub mod target;
pub mod upstream;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};

use crate::error::ProxyError;
use crate::server::AppState;

use observer::RelayContext;

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = req_headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);
    let ctx = RelayContext {
        correlation_id: &correlation_id,
        method: &method,
    };

    if method == Method::OPTIONS {
        tracing::debug!(correlation_id = %correlation_id, "answering preflight");
        return response::preflight();
    }

    match forward(&state, ctx, &uri, &req_headers, body).await {
        Ok(response) => response,
        Err(e) => {
            state.observer.request_rejected(ctx, &e);
            e.into_response()
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
async fn forward(
    state: &AppState,
    ctx: RelayContext<'_>,
    uri: &Uri,
    req_headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    // `Uri::path` is the raw request path; nothing has decoded it yet.
    let segments = target::wildcard_segments(uri.path(), &state.config.prefix);
    let resolved = target::resolve(&segments, state.config.segment_encoding)?;
    let target = target::with_query(&resolved, uri.query());
    state.observer.target_resolved(ctx, &target);

    let start = Instant::now();
    state.observer.outbound_issued(ctx, &target);
    let upstream = upstream::send(upstream::OutboundRequest {
        client: &state.http_client,
        method: ctx.method,
        target: &target,
        inbound_headers: req_headers,
        body,
        timeout: Duration::from_millis(state.config.timeout_ms),
        max_response_body: state.config.max_response_body,
    })
    .await?;

    let status = upstream.status;
    let response = response::relay(upstream, ctx.method);
    state
        .observer
        .response_relayed(ctx, status, start.elapsed().as_millis() as u64);
    Ok(response)
}
