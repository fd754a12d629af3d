//! Response relay: hand the upstream reply back to the caller.

use axum::body::Body;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};

use super::headers::{apply_cors, relay_response_headers};
use super::upstream::UpstreamResponse;

/// Answer a CORS preflight without contacting anything.
#[must_use]
pub fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    apply_cors(response.headers_mut());
    response
}

/// Upstream status and body verbatim, headers filtered, CORS enforced.
#[must_use]
pub fn relay(upstream: UpstreamResponse, method: &Method) -> Response {
    let headers = relay_response_headers(upstream.headers, *method == Method::HEAD);
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = headers;
    response
}
