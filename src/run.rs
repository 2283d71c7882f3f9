//! Command execution.
//!
//! This module wires the validated configuration to the library operations
//! behind each subcommand.

use std::io::{self, Write};

use thiserror::Error;

use config_handling::codec::yaml;
use config_handling::compile::{CompileError, Compiler, DumpOutcome};
use config_handling::config::{Command, OutputFormat, ValidatedConfig};
use config_handling::dispatch::{CommandDispatcher, ConsoleDispatcher};
use config_handling::extract::{ExtractError, ExtractionOutcome, Extractor};
use config_handling::layers::{ConfigLoader, LayerError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Inline level of the YAML printed by `show`.
const SHOW_INLINE_LEVEL: usize = 10;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Writing the generated configuration failed.
    #[error("Failed to dump configuration: {0}")]
    Compile(#[from] CompileError),

    /// Extracting extension settings failed.
    #[error("Failed to extract extension settings: {0}")]
    Extract(#[from] ExtractError),

    /// Loading the layers for `show` failed.
    #[error("Failed to load configuration: {0}")]
    Layers(#[from] LayerError),

    /// Rendering JSON output failed.
    #[error("Failed to render configuration: {0}")]
    Render(#[from] serde_json::Error),

    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// Executes a subcommand against the project's console.
///
/// # Errors
///
/// Returns an error if the subcommand fails.
pub fn execute(
    command: &Command,
    config: &ValidatedConfig,
    out: &mut impl Write,
) -> Result<(), RunError> {
    let dispatcher = ConsoleDispatcher::new(config.paths.clone(), config.console.clone());
    execute_with(command, config, &dispatcher, out)
}

/// Executes a subcommand with an explicit dispatcher.
///
/// `init` is handled before configuration is loaded and does nothing here.
///
/// # Errors
///
/// Returns an error if the subcommand fails.
pub fn execute_with<D>(
    command: &Command,
    config: &ValidatedConfig,
    dispatcher: &D,
    out: &mut impl Write,
) -> Result<(), RunError>
where
    D: CommandDispatcher + ?Sized,
{
    match command {
        Command::Dump { no_dev } => dump(config, dispatcher, *no_dev),
        Command::Extract => extract(config, dispatcher),
        Command::Show { format } => show(config, *format, out),
        Command::Init { .. } => Ok(()),
    }
}

fn dump<D>(config: &ValidatedConfig, dispatcher: &D, production_mode: bool) -> Result<(), RunError>
where
    D: CommandDispatcher + ?Sized,
{
    let outcome = Compiler::new(&config.paths, &config.context, dispatcher)
        .with_scaffold(config.scaffold.clone())
        .dump(production_mode)?;

    match outcome {
        DumpOutcome::Compiled { .. } => tracing::info!(
            "Compiled configuration for context {} (layer '{}')",
            config.context,
            config.context.layer_name()
        ),
        DumpOutcome::Scaffolded => {
            tracing::info!("Configuration is resolved at runtime by the development scaffold");
        }
    }
    Ok(())
}

fn extract<D>(config: &ValidatedConfig, dispatcher: &D) -> Result<(), RunError>
where
    D: CommandDispatcher + ?Sized,
{
    let outcome = Extractor::for_project(&config.paths, dispatcher).extract()?;
    if let ExtractionOutcome::Extracted { extensions } = outcome {
        tracing::debug!("Extracted extensions: {}", extensions.join(", "));
    }
    Ok(())
}

fn show(config: &ValidatedConfig, format: OutputFormat, out: &mut impl Write) -> Result<(), RunError> {
    let loader = ConfigLoader::new(config.paths.conf_dir(), config.context.layer_name());
    let configuration = loader.load()?;

    let rendered = match format {
        OutputFormat::Yaml => yaml::dump(&configuration, SHOW_INLINE_LEVEL),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&configuration)?),
    };
    out.write_all(rendered.as_bytes()).map_err(RunError::Output)
}
