//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared, read-only state holding the
//! proxy config, HTTP client, observer, and start time), [`build_router`]
//! for constructing the Axum router with middleware layers,
//! [`build_http_client`] for the connection-pooled hyper client, and
//! [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{any, get};
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::health::health_handler;
use crate::proxy;
use crate::proxy::headers::{ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN};
use crate::proxy::observer::{RelayObserver, TracingObserver};

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub config: ProxyConfig,
    pub http_client: HttpClient,
    pub observer: Arc<dyn RelayObserver>,
    pub start_time: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(config: ProxyConfig) -> Self {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    #[must_use]
    pub fn with_observer(config: ProxyConfig, observer: Arc<dyn RelayObserver>) -> Self {
        Self {
            config,
            http_client: build_http_client(),
            observer,
            start_time: Instant::now(),
        }
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring` as the default.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

/// The proxy is mounted three times so that `{prefix}` and `{prefix}/`
/// reach the handler too; a catch-all never matches an empty remainder.
pub fn build_router(state: Arc<AppState>) -> Router {
    let prefix = state.config.prefix.clone();
    let max_body = state.config.max_body;

    Router::new()
        .route("/health", get(health_handler))
        .route(&prefix, any(proxy::forward_handler))
        .route(&format!("{prefix}/"), any(proxy::forward_handler))
        .route(&format!("{prefix}/{{*target}}"), any(proxy::forward_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Covers responses produced outside the handler (413, 404).
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static(ALLOW_ORIGIN),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(ALLOW_METHODS),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(ALLOW_HEADERS),
                ))
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
