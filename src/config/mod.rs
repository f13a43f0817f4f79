//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Producer/consumer pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Work item values are drawn from `[0, max)`
    #[serde(default = "default_max")]
    pub max: u64,
    /// Number of producer threads
    #[serde(default = "default_workers")]
    pub producers: usize,
    /// Number of consumer threads
    #[serde(default = "default_workers")]
    pub consumers: usize,
    /// Base seed for producer value sources (entropy when unset)
    pub seed: Option<u64>,
}

fn default_max() -> u64 {
    4
}

fn default_workers() -> usize {
    2
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max: default_max(),
            producers: default_workers(),
            consumers: default_workers(),
            seed: None,
        }
    }
}

/// Capacity-1 admission gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Number of units offered to the gate
    #[serde(default = "default_signals")]
    pub signals: u64,
    /// Simulated work per drained unit, in microseconds
    #[serde(default = "default_work_unit_us")]
    pub work_unit_us: u64,
}

fn default_signals() -> u64 {
    100
}

fn default_work_unit_us() -> u64 {
    1000
}

impl ThrottleConfig {
    pub fn work_unit(&self) -> Duration {
        Duration::from_micros(self.work_unit_us)
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            signals: default_signals(),
            work_unit_us: default_work_unit_us(),
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// JSON report file (stdout when unset)
    pub json_path: Option<PathBuf>,
}

/// What the binary runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Pipeline,
    Throttle,
    Sequence,
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
    /// Number of values emitted in sequence mode
    #[serde(default = "default_sequence_count")]
    pub sequence_count: u64,
    /// Validate and print the configuration without running
    #[serde(default)]
    pub dry_run: bool,
}

fn default_sequence_count() -> u64 {
    5
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            sequence_count: default_sequence_count(),
            dry_run: false,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Mode: {}", self.runtime.mode)?;
        match self.runtime.mode {
            ExecutionMode::Pipeline => writeln!(f, "  Pipeline: {}", self.pipeline)?,
            ExecutionMode::Throttle => writeln!(f, "  Throttle: {}", self.throttle)?,
            ExecutionMode::Sequence => {
                writeln!(f, "  Sequence: count={}", self.runtime.sequence_count)?
            }
        }
        writeln!(f, "  Output: {}", self.output)?;
        Ok(())
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max={}, producers={}, consumers={}",
            self.max, self.producers, self.consumers
        )?;
        if let Some(seed) = self.seed {
            write!(f, ", seed={}", seed)?;
        }
        Ok(())
    }
}

impl fmt::Display for ThrottleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "signals={}, work_unit={}",
            self.signals,
            crate::util::time::format_duration(self.work_unit())
        )
    }
}

impl fmt::Display for OutputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => match &self.json_path {
                Some(path) => write!(f, "json ({})", path.display()),
                None => write!(f, "json (stdout)"),
            },
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Pipeline => write!(f, "pipeline"),
            ExecutionMode::Throttle => write!(f, "throttle"),
            ExecutionMode::Sequence => write!(f, "sequence"),
        }
    }
}
