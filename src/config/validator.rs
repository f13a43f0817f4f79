//! Configuration validation

use super::*;
use anyhow::Result;

/// Upper bound on signals offered in one throttle run
pub const MAX_THROTTLE_SIGNALS: u64 = 1_000_000;

/// Validate complete configuration
///
/// Only the section used by the selected mode is checked.
pub fn validate_config(config: &Config) -> Result<()> {
    match config.runtime.mode {
        ExecutionMode::Pipeline => validate_pipeline(&config.pipeline)?,
        ExecutionMode::Throttle => validate_throttle(&config.throttle)?,
        ExecutionMode::Sequence => {}
    }
    validate_output(&config.output)?;

    Ok(())
}

/// Validate pipeline configuration
pub fn validate_pipeline(pipeline: &PipelineConfig) -> Result<()> {
    if pipeline.max == 0 {
        anyhow::bail!("max must be at least 1, got 0");
    }

    // Without a producer nobody ever draws the sentinel, so the stop never comes
    if pipeline.producers == 0 {
        anyhow::bail!("producers must be at least 1");
    }

    if pipeline.consumers == 0 {
        anyhow::bail!("consumers must be at least 1");
    }

    Ok(())
}

/// Validate throttle configuration
pub fn validate_throttle(throttle: &ThrottleConfig) -> Result<()> {
    if throttle.signals == 0 {
        anyhow::bail!("signals must be at least 1");
    }

    if throttle.signals > MAX_THROTTLE_SIGNALS {
        anyhow::bail!(
            "signals must be at most {}, got {}",
            MAX_THROTTLE_SIGNALS,
            throttle.signals
        );
    }

    if throttle.work_unit_us == 0 {
        anyhow::bail!("work_unit must be greater than zero");
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if output.json_path.is_some() && output.format != OutputFormat::Json {
        anyhow::bail!("json_path is only valid with the json output format");
    }

    Ok(())
}
