//! Target resolution: turn the wildcard path segments into a target URL.
//!
//! Segments are joined with `/` in order, then percent-decoded at most
//! once according to [`SegmentEncoding`]. Decoding twice would turn a
//! target's own `%2525` into `%`, and not decoding would leave
//! `https%3A%2F%2F...` unusable, so the caller must say which case holds.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::config::SegmentEncoding;
use crate::error::ProxyError;

/// Split the raw (undecoded) request path into the segments captured
/// after `prefix`. Returns an empty list when nothing follows the prefix.
#[must_use]
pub fn wildcard_segments<'a>(path: &'a str, prefix: &str) -> Vec<&'a str> {
    let rest = path.strip_prefix(prefix).unwrap_or_default();
    match rest.strip_prefix('/') {
        Some("") | None => Vec::new(),
        Some(rest) => rest.split('/').collect(),
    }
}

/// Rebuild the target URL from its segments.
///
/// Only checks that the result starts with `http`; anything past that is
/// left for the outbound client to accept or reject.
pub fn resolve(segments: &[&str], encoding: SegmentEncoding) -> Result<String, ProxyError> {
    let joined = segments.join("/");

    let target = match encoding {
        SegmentEncoding::Raw => percent_decode_str(&joined)
            .decode_utf8()
            .map_err(|_| ProxyError::InvalidTarget)?
            .into_owned(),
        SegmentEncoding::PreDecoded => joined,
    };

    if !target.starts_with("http") {
        return Err(ProxyError::InvalidTarget);
    }
    Ok(target)
}

/// Carry the inbound query string over to the target, untouched.
#[must_use]
pub fn with_query<'a>(target: &'a str, query: Option<&str>) -> Cow<'a, str> {
    match query {
        Some(q) if !q.is_empty() => {
            let sep = if target.contains('?') { '&' } else { '?' };
            Cow::Owned(format!("{target}{sep}{q}"))
        }
        _ => Cow::Borrowed(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_raw(path: &str) -> Result<String, ProxyError> {
        resolve(&wildcard_segments(path, "/proxy"), SegmentEncoding::Raw)
    }

    #[test]
    fn decodes_fully_encoded_target() {
        assert_eq!(
            resolve_raw("/proxy/https%3A%2F%2Fhttpbin.org%2Fget").unwrap(),
            "https://httpbin.org/get"
        );
    }

    #[test]
    fn joins_unencoded_segments_in_order() {
        assert_eq!(
            resolve_raw("/proxy/http://api.example.com/v1/users").unwrap(),
            "http://api.example.com/v1/users"
        );
    }

    #[test]
    fn decodes_exactly_once() {
        // The target's own query value is "100%25" (a literal "100%"),
        // sent once more encoded through the proxy path.
        assert_eq!(
            resolve_raw("/proxy/https%3A%2F%2Fexample.com%2Fsearch%3Fq%3D100%2525").unwrap(),
            "https://example.com/search?q=100%25"
        );
        assert_eq!(
            resolve_raw("/proxy/https://example.com/search?q=100%2525").unwrap(),
            "https://example.com/search?q=100%25"
        );
    }

    #[test]
    fn pre_decoded_segments_are_not_decoded_again() {
        let segments = ["https:", "", "example.com", "search?q=100%25"];
        assert_eq!(
            resolve(&segments, SegmentEncoding::PreDecoded).unwrap(),
            "https://example.com/search?q=100%25"
        );
    }

    #[test]
    fn rejects_non_http_targets() {
        for path in [
            "/proxy/ftp://x",
            "/proxy/",
            "/proxy",
            "/proxy/javascript:alert(1)",
            "/proxy/javascript%3Aalert(1)",
            "/proxy/%20http://x",
        ] {
            assert!(
                matches!(resolve_raw(path), Err(ProxyError::InvalidTarget)),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn prefix_check_only() {
        assert_eq!(resolve_raw("/proxy/httpfoo").unwrap(), "httpfoo");
    }

    #[test]
    fn invalid_utf8_is_invalid_target() {
        assert!(matches!(
            resolve_raw("/proxy/http%3A%2F%2Fx%2F%FF"),
            Err(ProxyError::InvalidTarget)
        ));
    }

    #[test]
    fn segments_after_prefix() {
        assert!(wildcard_segments("/proxy", "/proxy").is_empty());
        assert!(wildcard_segments("/proxy/", "/proxy").is_empty());
        assert_eq!(
            wildcard_segments("/proxy/http:/a//b", "/proxy"),
            ["http:", "a", "", "b"]
        );
    }

    #[test]
    fn query_is_appended_verbatim() {
        assert_eq!(with_query("http://a/b", None), "http://a/b");
        assert_eq!(with_query("http://a/b", Some("")), "http://a/b");
        assert_eq!(with_query("http://a/b", Some("x=%20")), "http://a/b?x=%20");
        assert_eq!(with_query("http://a/b?y=1", Some("x=2")), "http://a/b?y=1&x=2");
    }
}
