//! `corsair run`: start the relay server.
//!
//! Validates the proxy settings, binds the listener, and serves the Axum
//! router until Ctrl+C or SIGTERM.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::error::CorsairError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), CorsairError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let config = args.proxy_config();
    config
        .validate()
        .map_err(|errors| CorsairError::ConfigValidation { errors })?;

    let state = Arc::new(AppState::new(config));
    let router = server::build_router(Arc::clone(&state));

    let addr = listen_addr(&args.host, args.port)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        prefix = %state.config.prefix,
        segment_encoding = ?state.config.segment_encoding,
        timeout_ms = state.config.timeout_ms,
        "corsair started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("corsair stopped");
    Ok(())
}

/// Parse the listen host as a bare IP so IPv6 hosts such as `::` work
/// without brackets.
fn listen_addr(host: &str, port: u16) -> Result<SocketAddr, CorsairError> {
    let ip: IpAddr = host.parse()?;
    Ok(SocketAddr::from((ip, port)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_and_ipv6_hosts() {
        assert_eq!(
            listen_addr("0.0.0.0", 3000).unwrap().to_string(),
            "0.0.0.0:3000"
        );
        assert_eq!(listen_addr("::", 3000).unwrap().to_string(), "[::]:3000");
        assert_eq!(listen_addr("::1", 8080).unwrap().to_string(), "[::1]:8080");
    }

    #[test]
    fn rejects_hostnames() {
        assert!(matches!(
            listen_addr("localhost", 3000),
            Err(CorsairError::AddressParse(_))
        ));
    }
}
