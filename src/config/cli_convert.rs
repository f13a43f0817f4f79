//! CLI to Config conversion utilities

use crate::config::{self, cli};
use anyhow::{Context, Result};

/// Parse a time string (e.g., "100us", "1ms", "10ms") to microseconds
pub fn parse_time_us(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("us") {
        (s.trim_end_matches("us"), 1u64)
    } else if s.ends_with("ms") {
        (s.trim_end_matches("ms"), 1000)
    } else if s.ends_with('s') {
        (s.trim_end_matches('s'), 1_000_000)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid time format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Time value out of range: {}", s))
}

/// Convert CLI ExecutionMode to config ExecutionMode
pub fn convert_mode(mode: cli::ExecutionMode) -> config::ExecutionMode {
    match mode {
        cli::ExecutionMode::Pipeline => config::ExecutionMode::Pipeline,
        cli::ExecutionMode::Throttle => config::ExecutionMode::Throttle,
        cli::ExecutionMode::Sequence => config::ExecutionMode::Sequence,
    }
}

/// Convert CLI OutputFormat to config OutputFormat
pub fn convert_format(format: cli::OutputFormat) -> config::OutputFormat {
    match format {
        cli::OutputFormat::Text => config::OutputFormat::Text,
        cli::OutputFormat::Json => config::OutputFormat::Json,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_us() {
        assert_eq!(parse_time_us("100us").unwrap(), 100);
        assert_eq!(parse_time_us("1ms").unwrap(), 1000);
        assert_eq!(parse_time_us("2s").unwrap(), 2_000_000);
        assert_eq!(parse_time_us(" 250 ").unwrap(), 250);
        assert_eq!(parse_time_us("5MS").unwrap(), 5000);
    }

    #[test]
    fn test_parse_time_us_invalid() {
        assert!(parse_time_us("fast").is_err());
        assert!(parse_time_us("1.5ms").is_err());
        assert!(parse_time_us("").is_err());
    }

    #[test]
    fn test_convert_mode() {
        assert_eq!(convert_mode(cli::ExecutionMode::Throttle), config::ExecutionMode::Throttle);
        assert_eq!(convert_format(cli::OutputFormat::Json), config::OutputFormat::Json);
    }
}
