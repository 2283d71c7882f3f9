//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::compile::ScaffoldTemplate;
use crate::context::ApplicationContext;
use crate::dispatch::ConsoleCommand;
use crate::paths::ProjectPaths;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Project locations
    pub paths: ProjectPaths,

    /// Application context selecting the configuration layer
    pub context: ApplicationContext,

    /// Console used to remove extracted settings
    pub console: ConsoleCommand,

    /// Template installed as `AdditionalConfiguration.php` in development mode
    pub scaffold: ScaffoldTemplate,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scaffold = match &self.scaffold {
            ScaffoldTemplate::Embedded => "built-in".to_string(),
            ScaffoldTemplate::File(path) => path.display().to_string(),
        };

        write!(
            f,
            "Config {{ root: {}, composer_root: {}, context: {}, layer: {}, console: {}, scaffold: {} }}",
            self.paths.root().display(),
            self.paths.composer_root().display(),
            self.context,
            self.context.layer_name(),
            self.console,
            scaffold,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (including their environment fallbacks) take precedence
    /// over TOML config values, which take precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The web root is missing
    /// - The application context cannot be parsed
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let paths = Self::resolve_paths(cli, toml)?;
        let context = Self::resolve_context(cli, toml)?;
        let console = Self::resolve_console(cli, toml);
        let scaffold = Self::resolve_scaffold(cli, toml);

        Ok(Self {
            paths,
            context,
            console,
            scaffold,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_paths(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ProjectPaths, ConfigError> {
        let root = cli
            .root
            .clone()
            .or_else(|| toml.and_then(|t| t.paths.root.clone()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::ROOT,
                    "Use --root, set TYPO3_PATH_ROOT or set paths.root in config file",
                )
            })?;

        // The composer root defaults to the web root
        let composer_root = cli
            .composer_root
            .clone()
            .or_else(|| toml.and_then(|t| t.paths.composer_root.clone()))
            .unwrap_or_else(|| root.clone());

        Ok(ProjectPaths::new(root, composer_root))
    }

    fn resolve_context(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<ApplicationContext, ConfigError> {
        // Priority: CLI/env > TOML > default
        let name = cli
            .context
            .as_deref()
            .or_else(|| toml.and_then(|t| t.context.name.as_deref()))
            .unwrap_or(defaults::CONTEXT);

        name.parse().map_err(ConfigError::from)
    }

    fn resolve_console(cli: &Cli, toml: Option<&TomlConfig>) -> ConsoleCommand {
        let console = toml.map(|t| &t.console);

        let binary = cli
            .console
            .clone()
            .or_else(|| console.and_then(|c| c.binary.clone()))
            .unwrap_or_else(|| PathBuf::from(defaults::CONSOLE_BINARY));

        // CLI arguments replace TOML arguments entirely
        let args = if cli.console_args.is_empty() {
            console.and_then(|c| c.args.clone()).unwrap_or_default()
        } else {
            cli.console_args.clone()
        };

        ConsoleCommand::new(binary, args)
    }

    fn resolve_scaffold(cli: &Cli, toml: Option<&TomlConfig>) -> ScaffoldTemplate {
        cli.scaffold_template
            .clone()
            .or_else(|| toml.and_then(|t| t.scaffold.template.clone()))
            .map_or(ScaffoldTemplate::Embedded, ScaffoldTemplate::File)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
