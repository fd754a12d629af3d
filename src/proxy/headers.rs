//! Header filtering in both directions, and CORS injection.
//!
//! [`outbound_headers`] decides what the target sees of the client's
//! headers. [`relay_response_headers`] decides what the client sees of the
//! target's headers, then [`apply_cors`] overrides the CORS policy with
//! the proxy's own. `HeaderMap` names are already lowercase, so every
//! exclusion below is case-insensitive.

use std::sync::LazyLock;

use http::header::{self, HeaderMap, HeaderName, HeaderValue};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET,POST,PUT,PATCH,DELETE,OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Requested-With, Accept";

/// Headers describing the client's connection to us rather than the request.
static CLIENT_IDENTITY: [HeaderName; 4] = [
    header::HOST,
    header::ORIGIN,
    header::REFERER,
    header::COOKIE,
];

/// Upstream CORS headers that would contradict ours.
static UPSTREAM_CORS: [HeaderName; 2] = [
    header::ACCESS_CONTROL_ALLOW_ORIGIN,
    header::ACCESS_CONTROL_EXPOSE_HEADERS,
];

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

/// Client headers minus identity headers and connection framing.
///
/// `content-length` is dropped because the outbound body is rebuilt from
/// the buffered bytes (or omitted entirely for GET/HEAD) and the client
/// frames it itself.
#[must_use]
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();
    for name in &CLIENT_IDENTITY {
        headers.remove(name);
    }
    strip_hop_by_hop(&mut headers);
    headers.remove(header::CONTENT_LENGTH);
    headers
}

/// Upstream headers minus upstream CORS and hop-by-hop headers, with the
/// proxy's CORS headers applied last.
///
/// The body has been fully collected, so the origin's `content-length` is
/// recomputed by the server. HEAD responses keep it since they carry no
/// body to measure.
#[must_use]
pub fn relay_response_headers(upstream: HeaderMap, keep_content_length: bool) -> HeaderMap {
    let mut headers = upstream;
    for name in &UPSTREAM_CORS {
        headers.remove(name);
    }
    strip_hop_by_hop(&mut headers);
    if !keep_content_length {
        headers.remove(header::CONTENT_LENGTH);
    }
    apply_cors(&mut headers);
    headers
}

/// Set the three permissive CORS headers, replacing any existing values.
pub fn apply_cors(headers: &mut HeaderMap) {
    for (name, value) in cors_headers() {
        headers.insert(name, value);
    }
}

#[must_use]
pub fn cors_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(
                name.parse::<HeaderName>().unwrap(),
                value.parse().unwrap(),
            );
        }
        headers
    }

    #[test]
    fn drops_identity_headers_in_any_case() {
        let inbound = map(&[
            ("HOST", "proxy.local"),
            ("Origin", "https://app.example"),
            ("referer", "https://app.example/page"),
            ("CoOkIe", "session=1"),
            ("authorization", "Bearer abc"),
            ("content-type", "application/json"),
        ]);

        let out = outbound_headers(&inbound);

        assert!(out.get("host").is_none());
        assert!(out.get("origin").is_none());
        assert!(out.get("referer").is_none());
        assert!(out.get("cookie").is_none());
        assert_eq!(out.get("authorization").unwrap(), "Bearer abc");
        assert_eq!(out.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn keeps_repeated_values() {
        let inbound = map(&[("accept", "text/html"), ("accept", "application/json")]);
        let out = outbound_headers(&inbound);
        assert_eq!(out.get_all("accept").iter().count(), 2);
    }

    #[test]
    fn outbound_drops_framing() {
        let inbound = map(&[
            ("connection", "keep-alive"),
            ("content-length", "12"),
            ("transfer-encoding", "chunked"),
        ]);
        assert!(outbound_headers(&inbound).is_empty());
    }

    #[test]
    fn upstream_cors_is_replaced() {
        let upstream = map(&[
            ("access-control-allow-origin", "https://only.example"),
            ("Access-Control-Expose-Headers", "x-secret"),
            ("access-control-allow-methods", "GET"),
            ("content-type", "text/plain"),
        ]);

        let out = relay_response_headers(upstream, false);

        assert_eq!(out.get_all("access-control-allow-origin").iter().count(), 1);
        assert_eq!(out.get("access-control-allow-origin").unwrap(), "*");
        assert!(out.get("access-control-expose-headers").is_none());
        assert_eq!(out.get("access-control-allow-methods").unwrap(), ALLOW_METHODS);
        assert_eq!(out.get("access-control-allow-headers").unwrap(), ALLOW_HEADERS);
        assert_eq!(out.get("content-type").unwrap(), "text/plain");
    }

    #[test]
    fn content_length_kept_only_on_request() {
        let upstream = map(&[("content-length", "42"), ("transfer-encoding", "chunked")]);

        let relayed = relay_response_headers(upstream.clone(), false);
        assert!(relayed.get("content-length").is_none());
        assert!(relayed.get("transfer-encoding").is_none());

        let head = relay_response_headers(upstream, true);
        assert_eq!(head.get("content-length").unwrap(), "42");
    }
}
