//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health), and their associated argument structs.
//! Every `run` flag has an environment variable equivalent for container
//! deployments.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{ProxyConfig, SegmentEncoding};

#[derive(Parser)]
#[command(
    name = "corsair",
    version,
    about = "Single-hop HTTP relay with permissive CORS",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        corsair run                          Listen on 0.0.0.0:3000\n  \
        curl localhost:3000/proxy/https%3A%2F%2Fhttpbin.org%2Fget"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Run(Box<RunArgs>),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        corsair run                                 Defaults\n  \
        corsair run -p 8080 --pretty                Local dev mode\n  \
        corsair run --prefix /relay --timeout 5000  Custom mount point")]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Path prefix the wildcard target route is mounted under
    #[arg(long, env = "PROXY_PREFIX", default_value = "/proxy")]
    pub prefix: String,

    /// Target segments were already percent-decoded by a fronting layer
    #[arg(long, env = "SEGMENTS_PRE_DECODED")]
    pub segments_pre_decoded: bool,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Upstream exchange timeout in milliseconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        help_heading = "Tuning"
    )]
    pub timeout: u64,

    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,

    /// Max buffered upstream response body size in bytes
    #[arg(
        long,
        env = "MAX_RESPONSE_BODY_SIZE",
        default_value_t = 10_485_760,
        help_heading = "Tuning"
    )]
    pub max_response_body: usize,
}

impl RunArgs {
    #[must_use]
    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            prefix: self.prefix.clone(),
            segment_encoding: if self.segments_pre_decoded {
                SegmentEncoding::PreDecoded
            } else {
                SegmentEncoding::Raw
            },
            timeout_ms: self.timeout,
            max_body: self.max_body,
            max_response_body: self.max_response_body,
        }
    }
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::parse_from(["corsair", "run"]);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        let config = args.proxy_config();
        assert_eq!(config, ProxyConfig::default());
    }

    #[test]
    fn pre_decoded_flag_selects_encoding() {
        let cli = Cli::parse_from(["corsair", "run", "--segments-pre-decoded"]);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(
            args.proxy_config().segment_encoding,
            SegmentEncoding::PreDecoded
        );
    }

    #[test]
    fn pretty_and_json_conflict() {
        assert!(Cli::try_parse_from(["corsair", "run", "--pretty", "--json"]).is_err());
    }
}
