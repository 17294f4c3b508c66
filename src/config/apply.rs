use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{HammerArgs, PositiveU64, PositiveUsize, parse_header, validate_status_code};
use crate::error::ConfigError;

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments that were not given on the
/// command line.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut HammerArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "urls")
        && let Some(urls) = config.urls.clone()
    {
        args.urls = urls;
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = Some(
            PositiveUsize::try_from(concurrency).map_err(|_small| ConfigError::NotPositive {
                field: "concurrency",
            })?,
        );
    }

    if !is_cli(matches, "delay")
        && let Some(delay) = config.delay.as_ref()
    {
        args.delay = delay
            .to_duration()
            .map_err(|err| ConfigError::InvalidDuration {
                field: "delay",
                source: err,
            })?;
    }

    if !is_cli(matches, "http2")
        && let Some(http2) = config.http2
    {
        args.http2 = http2;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        let mut parsed = Vec::with_capacity(headers.len());
        for header in headers {
            parsed.push(
                parse_header(header).map_err(|err| ConfigError::InvalidHeader { source: err })?,
            );
        }
        args.headers = parsed;
    }

    if !is_cli(matches, "expected_status")
        && let Some(codes) = config.expected_status.as_ref()
    {
        let mut parsed = Vec::with_capacity(codes.len());
        for code in codes {
            parsed.push(
                validate_status_code(*code)
                    .map_err(|err| ConfigError::InvalidExpectedStatus { source: err })?,
            );
        }
        args.expected_status = parsed;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = Some(
            PositiveU64::try_from(requests).map_err(|_small| ConfigError::NotPositive {
                field: "requests",
            })?,
        );
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = Some(positive_duration(timeout, "timeout")?);
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = Some(positive_duration(timeout, "connect_timeout")?);
    }

    Ok(())
}

fn positive_duration(
    value: &super::types::DurationValue,
    field: &'static str,
) -> Result<std::time::Duration, ConfigError> {
    let duration = value
        .to_duration()
        .map_err(|err| ConfigError::InvalidDuration { field, source: err })?;
    if duration.is_zero() {
        return Err(ConfigError::NotPositive { field });
    }
    Ok(duration)
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
