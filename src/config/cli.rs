//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionMode {
    /// Producers and consumers with a moderated stop (default)
    Pipeline,
    /// Capacity-1 admission gate demonstration
    Throttle,
    /// Owned channel generator
    Sequence,
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Stopline - bounded work distribution with a centralized stop signal
#[derive(Parser, Debug)]
#[command(name = "stopline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// What to run
    #[arg(long, value_enum)]
    pub mode: Option<ExecutionMode>,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long, env = "STOPLINE_CONFIG")]
    pub config: Option<PathBuf>,

    // === Pipeline Options ===
    /// Upper bound (exclusive) of drawn values
    #[arg(short = 'm', long)]
    pub max: Option<u64>,

    /// Number of producer threads
    #[arg(short = 'p', long)]
    pub producers: Option<usize>,

    /// Number of consumer threads
    #[arg(short = 'n', long)]
    pub consumers: Option<usize>,

    /// Seed for reproducible value sources
    #[arg(long)]
    pub seed: Option<u64>,

    // === Throttle Options ===
    /// Number of units offered to the gate
    #[arg(long)]
    pub signals: Option<u64>,

    /// Simulated work per unit (e.g., 500us, 1ms, 1s)
    #[arg(long)]
    pub work_unit: Option<String>,

    // === Sequence Options ===
    /// Number of values emitted in sequence mode
    #[arg(long)]
    pub count: Option<u64>,

    // === Output Options ===
    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the JSON report to a file instead of stdout
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Validate and print configuration without running
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["stopline"]);

        assert!(cli.mode.is_none());
        assert!(cli.max.is_none());
        assert!(!cli.dry_run);
        assert!(!cli.debug);
    }

    #[test]
    fn test_parse_pipeline_flags() {
        let cli = Cli::parse_from([
            "stopline", "--mode", "pipeline", "-m", "8", "-p", "3", "-n", "4", "--seed", "9",
        ]);

        assert_eq!(cli.mode, Some(ExecutionMode::Pipeline));
        assert_eq!(cli.max, Some(8));
        assert_eq!(cli.producers, Some(3));
        assert_eq!(cli.consumers, Some(4));
        assert_eq!(cli.seed, Some(9));
    }

    #[test]
    fn test_parse_throttle_flags() {
        let cli = Cli::parse_from([
            "stopline", "--mode", "throttle", "--signals", "10", "--work-unit", "2ms", "--format", "json",
        ]);

        assert_eq!(cli.mode, Some(ExecutionMode::Throttle));
        assert_eq!(cli.signals, Some(10));
        assert_eq!(cli.work_unit.as_deref(), Some("2ms"));
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }
}
