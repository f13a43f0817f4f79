//! JSON output formatting
//!
//! Every report is wrapped in an envelope carrying the tool version, the mode
//! that produced it and the generation time.

use crate::config::ExecutionMode;
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Top-level JSON document
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<'a, T: Serialize> {
    pub version: &'static str,
    pub mode: ExecutionMode,
    pub generated_at: DateTime<Utc>,
    pub report: &'a T,
}

impl<'a, T: Serialize> JsonEnvelope<'a, T> {
    pub fn new(mode: ExecutionMode, report: &'a T) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            mode,
            generated_at: Utc::now(),
            report,
        }
    }
}

/// Serialize a report to a JSON string
pub fn to_json_string<T: Serialize>(mode: ExecutionMode, report: &T, pretty: bool) -> Result<String> {
    let envelope = JsonEnvelope::new(mode, report);
    let json = if pretty {
        serde_json::to_string_pretty(&envelope)
    } else {
        serde_json::to_string(&envelope)
    };
    json.context("Failed to serialize report")
}

/// Write a report to a file, or to stdout when no path is given
pub fn write_json_output<T: Serialize>(
    output_path: Option<&Path>,
    mode: ExecutionMode,
    report: &T,
) -> Result<()> {
    let json = to_json_string(mode, report, true)?;

    match output_path {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create JSON output: {}", path.display()))?;
            writeln!(file, "{}", json)
                .with_context(|| format!("Failed to write JSON output: {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json).context("Failed to write JSON output")?;
        }
    }

    Ok(())
}
