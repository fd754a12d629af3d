//! Corsair is a single-hop HTTP relay for browser clients.
//!
//! A request to `/proxy/<target>` is forwarded to `<target>` with the
//! client's method, headers and body. The upstream response is relayed
//! back verbatim, except that permissive CORS headers replace whatever
//! the upstream declared. Nothing is cached or shared between requests.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`config`] -- Effective proxy settings and their validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- The forwarder: target resolution ([`proxy::target`]),
//!   request relay ([`proxy::upstream`]), response relay
//!   ([`proxy::response`]), header filtering ([`proxy::headers`]) and the
//!   phase observer hook ([`proxy::observer`]).
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
