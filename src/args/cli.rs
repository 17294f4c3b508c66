use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_delay_arg, parse_duration_arg, parse_header, parse_positive_u64, parse_positive_usize,
    parse_status_code,
};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Continuous HTTP load generator - keeps a bounded number of GET requests in flight against one or more URLs and reports throughput."
)]
pub struct HammerArgs {
    /// Target URLs, requested in round-robin order
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Concurrency factor, number of requests to make concurrently (defaults to available parallelism)
    #[arg(long, short = 'c', value_parser = parse_positive_usize)]
    pub concurrency: Option<PositiveUsize>,

    /// Delay to wait after making a request (supports ms/s/m/h)
    #[arg(long, short = 'd', default_value = "0", value_parser = parse_delay_arg)]
    pub delay: Duration,

    /// Use HTTP/2 (prior knowledge) for requests
    #[arg(long = "http2")]
    pub http2: bool,

    /// Request header in 'Name: Value' format (repeatable, applied additively)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Status code treated as expected (repeatable; defaults to 200 and 404)
    #[arg(long = "expected-status", value_parser = parse_status_code)]
    pub expected_status: Vec<u16>,

    /// Stop after dispatching this many requests (runs until terminated when unset)
    #[arg(long = "requests", short = 'n', value_parser = parse_positive_u64)]
    pub requests: Option<PositiveU64>,

    /// Per-request timeout enforced by the HTTP client (supports ms/s/m/h)
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// Connect timeout enforced by the HTTP client (supports ms/s/m/h)
    #[arg(long = "connect-timeout", value_parser = parse_duration_arg)]
    pub connect_timeout: Option<Duration>,

    /// Path to a TOML or JSON config file (defaults to ./hammer.toml or ./hammer.json)
    #[arg(long, short = 'C')]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored console output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
