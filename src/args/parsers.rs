use std::time::Duration;

use super::types::{PositiveU64, PositiveUsize};
use crate::error::ValidationError;

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        Some(_) | None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

pub(super) fn parse_positive_u64(s: &str) -> Result<PositiveU64, ValidationError> {
    s.parse::<PositiveU64>()
}

pub(super) fn parse_positive_usize(s: &str) -> Result<PositiveUsize, ValidationError> {
    s.parse::<PositiveUsize>()
}

pub(crate) fn parse_status_code(s: &str) -> Result<u16, ValidationError> {
    let invalid = || ValidationError::InvalidStatusCode {
        value: s.to_owned(),
    };
    let code: u16 = s.trim().parse().map_err(|_parse| invalid())?;
    validate_status_code(code).map_err(|_range| invalid())
}

pub(crate) fn validate_status_code(code: u16) -> Result<u16, ValidationError> {
    if (100..=999).contains(&code) {
        Ok(code)
    } else {
        Err(ValidationError::InvalidStatusCode {
            value: code.to_string(),
        })
    }
}

/// Parses a strictly positive duration such as `250ms`, `10s`, `2m`, or `1h`.
/// A bare number is read as seconds.
pub(crate) fn parse_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    let duration = parse_duration_inner(s)?;
    if duration.is_zero() {
        return Err(ValidationError::Message("Duration must be > 0.".to_owned()));
    }
    Ok(duration)
}

/// Same grammar as [`parse_duration_arg`], but zero means "no delay".
pub(crate) fn parse_delay_arg(s: &str) -> Result<Duration, ValidationError> {
    parse_duration_inner(s)
}

fn parse_duration_inner(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    let duration = match unit {
        "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => {
            let secs = number
                .checked_mul(60)
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        "h" => {
            let secs = number
                .checked_mul(60)
                .and_then(|minutes| minutes.checked_mul(60))
                .ok_or(ValidationError::DurationOverflow)?;
            Duration::from_secs(secs)
        }
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };

    Ok(duration)
}
