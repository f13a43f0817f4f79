//! Stopline CLI entry point

use anyhow::{Context, Result};
use log::info;
use stopline::config::cli::Cli;
use stopline::config::{toml, validator, Config, ExecutionMode, OutputFormat};
use stopline::output::{json, text};
use stopline::worker::owner;
use stopline::{throttle, Pipeline};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    setup_logging(cli.debug);

    let config = toml::load_config(&cli).context("Failed to load configuration")?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    if config.output.format == OutputFormat::Text {
        println!("Stopline v{}", env!("CARGO_PKG_VERSION"));
        println!();
        print!("{}", config);
        println!();
    }

    if config.runtime.dry_run {
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    match config.runtime.mode {
        ExecutionMode::Pipeline => run_pipeline(&config),
        ExecutionMode::Throttle => run_throttle(&config),
        ExecutionMode::Sequence => run_sequence(&config),
    }
}

/// Initialize env_logger; RUST_LOG overrides the default level
fn setup_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn run_pipeline(config: &Config) -> Result<()> {
    let report = Pipeline::new(config.pipeline.clone())
        .run()
        .context("Pipeline run failed")?;

    match config.output.format {
        OutputFormat::Text => text::print_run_report(&report),
        OutputFormat::Json => {
            json::write_json_output(config.output.json_path.as_deref(), ExecutionMode::Pipeline, &report)?
        }
    }

    Ok(())
}

fn run_throttle(config: &Config) -> Result<()> {
    let report = throttle::run_throttle(&config.throttle).context("Throttle run failed")?;

    match config.output.format {
        OutputFormat::Text => text::print_throttle_report(&report),
        OutputFormat::Json => {
            json::write_json_output(config.output.json_path.as_deref(), ExecutionMode::Throttle, &report)?
        }
    }

    if !report.is_serialized() {
        anyhow::bail!(
            "Admission bound violated: max_in_flight={}, violations={}",
            report.max_in_flight,
            report.violations
        );
    }

    Ok(())
}

fn run_sequence(config: &Config) -> Result<()> {
    let rx = owner::owned_sequence(config.runtime.sequence_count)?;
    let values = owner::drain_sequence(rx);
    info!("Sequence closed after {} value(s)", values.len());

    match config.output.format {
        OutputFormat::Text => text::print_sequence(&values),
        OutputFormat::Json => {
            json::write_json_output(config.output.json_path.as_deref(), ExecutionMode::Sequence, &values)?
        }
    }

    Ok(())
}
