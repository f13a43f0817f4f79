//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert::{convert_format, convert_mode, parse_time_us};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    if let Some(mode) = cli.mode {
        config.runtime.mode = convert_mode(mode);
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }
    if let Some(count) = cli.count {
        config.runtime.sequence_count = count;
    }

    // Pipeline
    if let Some(max) = cli.max {
        config.pipeline.max = max;
    }
    if let Some(producers) = cli.producers {
        config.pipeline.producers = producers;
    }
    if let Some(consumers) = cli.consumers {
        config.pipeline.consumers = consumers;
    }
    if cli.seed.is_some() {
        config.pipeline.seed = cli.seed;
    }

    // Throttle
    if let Some(signals) = cli.signals {
        config.throttle.signals = signals;
    }
    if let Some(work_unit) = &cli.work_unit {
        config.throttle.work_unit_us = parse_time_us(work_unit)
            .context("Invalid work unit")?;
    }

    // Output
    if let Some(format) = cli.format {
        config.output.format = convert_format(format);
    }
    if let Some(path) = &cli.json_output {
        config.output.json_path = Some(path.clone());
        config.output.format = OutputFormat::Json;
    }

    Ok(config)
}

/// Build the effective configuration: optional file, then CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let base = match &cli.config {
        Some(path) => parse_toml_file(path)?,
        None => Config::default(),
    };

    merge_cli_with_config(cli, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[pipeline]
max = 10
producers = 3
consumers = 5
seed = 42

[throttle]
signals = 20
work_unit_us = 500

[output]
format = "json"
json_path = "report.json"

[runtime]
mode = "throttle"
"#;

        let config = parse_toml_string(toml).unwrap();
        assert_eq!(config.pipeline.max, 10);
        assert_eq!(config.pipeline.producers, 3);
        assert_eq!(config.pipeline.consumers, 5);
        assert_eq!(config.pipeline.seed, Some(42));
        assert_eq!(config.throttle.signals, 20);
        assert_eq!(config.throttle.work_unit_us, 500);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.runtime.mode, ExecutionMode::Throttle);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = parse_toml_string("[pipeline]\nproducers = 8\n").unwrap();

        assert_eq!(config.pipeline.producers, 8);
        assert_eq!(config.pipeline.max, 4);
        assert_eq!(config.pipeline.consumers, 2);
        assert_eq!(config.throttle.signals, 100);
    }

    #[test]
    fn test_parse_invalid_config() {
        assert!(parse_toml_string("[pipeline]\nmax = \"lots\"\n").is_err());
    }

    #[test]
    fn test_parse_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\nconsumers = 6").unwrap();

        let config = parse_toml_file(file.path()).unwrap();
        assert_eq!(config.pipeline.consumers, 6);
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_toml_file(Path::new("/nonexistent/stopline.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\nmax = 10\nproducers = 3").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::parse_from(["stopline", "--config", &path, "--max", "6", "--work-unit", "2ms"]);

        let config = load_config(&cli).unwrap();
        assert_eq!(config.pipeline.max, 6);
        assert_eq!(config.pipeline.producers, 3);
        assert_eq!(config.throttle.work_unit_us, 2000);
    }

    #[test]
    fn test_json_output_implies_json_format() {
        let cli = Cli::parse_from(["stopline", "--json-output", "out.json"]);
        let config = merge_cli_with_config(&cli, Config::default()).unwrap();

        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.json_path, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_invalid_work_unit() {
        let cli = Cli::parse_from(["stopline", "--work-unit", "soon"]);
        assert!(merge_cli_with_config(&cli, Config::default()).is_err());
    }
}
