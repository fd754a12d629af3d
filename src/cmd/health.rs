//! `corsair health`: check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! a summary, or with `--json` just the effective proxy settings.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::CorsairError;
use crate::health::HealthResponse;

pub async fn execute(args: HealthArgs) -> Result<(), CorsairError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let uri: hyper::Uri =
        url.parse()
            .map_err(|e: hyper::http::uri::InvalidUri| CorsairError::UriParse {
                source: Box::new(e),
            })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| CorsairError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| CorsairError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| CorsairError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| CorsairError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(CorsairError::HealthCheckFailed(status));
    }

    let health: HealthResponse =
        serde_json::from_slice(&body).map_err(|e| CorsairError::HttpRequest {
            source: Box::new(e),
        })?;

    if args.json {
        let proxy = serde_json::to_string_pretty(&health.proxy).map_err(|e| {
            CorsairError::HttpRequest {
                source: Box::new(e),
            }
        })?;
        println!("{proxy}");
    } else {
        print!("{}", render_summary(&health, &args.url));
    }

    Ok(())
}

fn render_summary(health: &HealthResponse, url: &str) -> String {
    let proxy = &health.proxy;
    format!(
        "\u{2713} corsair is {} ({url})\n  \
         version:          {}\n  \
         uptime:           {}\n  \
         prefix:           {}\n  \
         segment encoding: {:?}\n  \
         timeout:          {}ms\n  \
         body limits:      {} bytes in, {} bytes out\n",
        health.status,
        health.version,
        format_uptime(health.uptime_seconds),
        proxy.prefix,
        proxy.segment_encoding,
        proxy.timeout_ms,
        proxy.max_body,
        proxy.max_response_body,
    )
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_uptime, render_summary};
    use crate::config::ProxyConfig;
    use crate::health::HealthResponse;

    #[test]
    fn uptime_formats() {
        assert_eq!(format_uptime(5), "5s");
        assert_eq!(format_uptime(65), "1m 5s");
        assert_eq!(format_uptime(3725), "1h 2m 5s");
    }

    #[test]
    fn summary_lists_proxy_settings() {
        let health = HealthResponse {
            status: "healthy".into(),
            version: "0.1.0".into(),
            uptime_seconds: 65,
            proxy: ProxyConfig::default(),
        };
        let summary = render_summary(&health, "http://localhost:3000");
        assert!(summary.starts_with("\u{2713} corsair is healthy (http://localhost:3000)\n"));
        assert!(summary.contains("uptime:           1m 5s\n"));
        assert!(summary.contains("prefix:           /proxy\n"));
        assert!(summary.contains("segment encoding: Raw\n"));
        assert!(summary.contains("body limits:      1048576 bytes in, 10485760 bytes out\n"));
    }
}
