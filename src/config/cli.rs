//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.
//! Project locations and the context fall back to the environment variables
//! the TYPO3 console sets.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use super::defaults;

/// typo3-config-handling: layered configuration for TYPO3
///
/// Compiles YAML configuration layers into a generated
/// `LocalConfiguration.php` and extracts extension settings from
/// hand-edited ones.
#[derive(Debug, Parser)]
#[command(name = "typo3-config-handling")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Web root containing typo3conf/
    #[arg(long, env = "TYPO3_PATH_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Composer root containing conf/ (defaults to the web root)
    #[arg(long = "composer-root", env = "TYPO3_PATH_COMPOSER_ROOT", global = true)]
    pub composer_root: Option<PathBuf>,

    /// Application context, e.g. Production or Development/Local
    #[arg(long, env = "TYPO3_CONTEXT", global = true)]
    pub context: Option<String>,

    /// Console binary used to remove configuration paths
    #[arg(long, global = true)]
    pub console: Option<PathBuf>,

    /// Argument placed before every console sub-command (can be specified multiple times)
    #[arg(
        long = "console-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        global = true
    )]
    pub console_args: Vec<String>,

    /// Template installed as AdditionalConfiguration.php in development mode
    #[arg(long = "scaffold-template", global = true)]
    pub scaffold_template: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for typo3-config-handling
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Write LocalConfiguration.php
    Dump {
        /// Compile the resolved configuration for production instead of
        /// installing the development scaffold
        #[arg(long = "no-dev")]
        no_dev: bool,
    },

    /// Move extension settings of a hand-edited LocalConfiguration.php into conf/config.extension.yml
    Extract,

    /// Print the resolved configuration of the active context
    Show {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Output format of the `show` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML, as in the layer files
    Yaml,
    /// JSON, for the development scaffold
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
