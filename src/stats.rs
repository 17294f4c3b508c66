//! Throughput snapshots for the progress line.
use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::output::OutputSink;

const MILLIS_PER_MINUTE: u128 = 60_000;
/// Rates are kept in hundredths so they can be printed with two decimals.
const RATE_SCALE: u128 = 100;

/// Requests completed so far and the time it took. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub count: u64,
    pub elapsed: Duration,
}

impl StatsSnapshot {
    #[must_use]
    pub const fn new(count: u64, elapsed: Duration) -> Self {
        Self { count, elapsed }
    }

    #[must_use]
    pub fn capture(count: u64, start: Instant) -> Self {
        Self::new(count, start.elapsed())
    }

    /// Average requests per minute, scaled by 100. Zero until a millisecond
    /// has elapsed.
    #[must_use]
    pub fn rate_per_minute_x100(&self) -> u128 {
        u128::from(self.count)
            .saturating_mul(MILLIS_PER_MINUTE)
            .saturating_mul(RATE_SCALE)
            .checked_div(self.elapsed.as_millis())
            .unwrap_or(0)
    }

    #[must_use]
    pub fn rate_per_minute(&self) -> RatePerMinute {
        RatePerMinute(self.rate_per_minute_x100())
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Completed {} total requests in {} (average {} requests/minute)...",
            self.count,
            format_elapsed(self.elapsed),
            self.rate_per_minute()
        )
    }
}

/// Requests per minute in hundredths, printed as `123.45`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RatePerMinute(pub u128);

impl fmt::Display for RatePerMinute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.checked_div(RATE_SCALE).unwrap_or(0);
        let frac = self.0.checked_rem(RATE_SCALE).unwrap_or(0);
        write!(f, "{}.{:02}", whole, frac)
    }
}

/// Rounds to whole seconds and prints as `1h2m3s`, `4m0s`, or `12s`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed
        .as_millis()
        .saturating_add(500)
        .checked_div(1000)
        .unwrap_or(0);
    let hours = total_secs.checked_div(3600).unwrap_or(0);
    let minutes = total_secs
        .checked_rem(3600)
        .and_then(|rest| rest.checked_div(60))
        .unwrap_or(0);
    let seconds = total_secs.checked_rem(60).unwrap_or(0);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Emits a progress snapshot for `count` requests. Best effort: dropped when
/// the console is behind.
pub fn report_stats(sink: &OutputSink, count: u64, start: Instant) {
    sink.try_progress(StatsSnapshot::capture(count, start));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_count_per_elapsed_minute() -> Result<(), String> {
        let snapshot = StatsSnapshot::new(120, Duration::from_secs(60));
        if snapshot.rate_per_minute_x100() != 12_000 {
            return Err(format!(
                "Expected 120 requests/minute, got {}",
                snapshot.rate_per_minute()
            ));
        }
        if snapshot.rate_per_minute().to_string() != "120.00" {
            return Err(format!("Unexpected rate text: {}", snapshot.rate_per_minute()));
        }
        Ok(())
    }

    #[test]
    fn rate_keeps_two_decimals() -> Result<(), String> {
        let snapshot = StatsSnapshot::new(1, Duration::from_secs(7));
        let text = snapshot.rate_per_minute().to_string();
        if text != "8.57" {
            return Err(format!("Expected 8.57, got {}", text));
        }
        Ok(())
    }

    #[test]
    fn zero_elapsed_reports_zero_rate() -> Result<(), String> {
        let snapshot = StatsSnapshot::new(5, Duration::ZERO);
        if snapshot.rate_per_minute_x100() != 0 {
            return Err("Expected zero rate before any time has passed".to_owned());
        }
        Ok(())
    }

    #[test]
    fn elapsed_is_rounded_to_seconds() -> Result<(), String> {
        let cases = [
            (Duration::from_millis(400), "0s"),
            (Duration::from_millis(1_500), "2s"),
            (Duration::from_secs(65), "1m5s"),
            (Duration::from_secs(240), "4m0s"),
            (Duration::from_secs(3_723), "1h2m3s"),
        ];
        for (elapsed, expected) in cases {
            let text = format_elapsed(elapsed);
            if text != expected {
                return Err(format!("{:?}: expected {}, got {}", elapsed, expected, text));
            }
        }
        Ok(())
    }

    #[test]
    fn progress_line_format() -> Result<(), String> {
        let line = StatsSnapshot::new(120, Duration::from_secs(60)).to_string();
        let expected = "Completed 120 total requests in 1m0s (average 120.00 requests/minute)...";
        if line != expected {
            return Err(format!("Unexpected line: {}", line));
        }
        Ok(())
    }
}
