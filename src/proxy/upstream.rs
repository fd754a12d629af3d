//! Request relay: issue the outbound request and buffer the reply.
//!
//! The method is copied, headers are filtered by
//! [`outbound_headers`](super::headers::outbound_headers), and the body is
//! forwarded byte-for-byte except for GET and HEAD, which never carry one.
//! Every failure between parsing the target URI and reading the last body
//! byte becomes [`ProxyError::Upstream`]. Nothing is retried.

use std::time::Duration;

use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};

use crate::error::ProxyError;
use crate::server::HttpClient;

use super::headers::outbound_headers;

pub struct OutboundRequest<'a> {
    pub client: &'a HttpClient,
    pub method: &'a Method,
    pub target: &'a str,
    pub inbound_headers: &'a HeaderMap,
    pub body: Bytes,
    pub timeout: Duration,
    pub max_response_body: usize,
}

#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[must_use]
pub fn carries_body(method: &Method) -> bool {
    *method != Method::GET && *method != Method::HEAD
}

pub async fn send(req: OutboundRequest<'_>) -> Result<UpstreamResponse, ProxyError> {
    // `Url` percent-encodes what `Uri` would reject outright (spaces, etc.).
    let parsed = url::Url::parse(req.target).map_err(ProxyError::upstream)?;
    let uri: hyper::Uri = parsed.as_str().parse().map_err(ProxyError::upstream)?;

    let body = if carries_body(req.method) {
        req.body
    } else {
        Bytes::new()
    };

    let mut request = hyper::Request::builder()
        .method(req.method.clone())
        .uri(uri)
        .body(Full::new(body))
        .map_err(ProxyError::upstream)?;
    *request.headers_mut() = outbound_headers(req.inbound_headers);

    let max_body = req.max_response_body;
    let exchange = async {
        let response = req
            .client
            .request(request)
            .await
            .map_err(ProxyError::upstream)?;
        let (parts, body) = response.into_parts();
        let body = Limited::new(body, max_body)
            .collect()
            .await
            .map_err(ProxyError::upstream)?
            .to_bytes();

        Ok::<_, ProxyError>(UpstreamResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    };

    tokio::time::timeout(req.timeout, exchange)
        .await
        .map_err(|_| {
            ProxyError::upstream(format!(
                "upstream timed out after {}ms",
                req.timeout.as_millis()
            ))
        })?
}
