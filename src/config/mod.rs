//! Configuration layer for typo3-config-handling.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! This is the configuration of the tool itself; the TYPO3 configuration it
//! compiles lives in the layer files handled by [`crate::layers`].
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values passed on the command line
//! 2. **Environment variables** - `TYPO3_PATH_ROOT`, `TYPO3_PATH_COMPOSER_ROOT`, `TYPO3_CONTEXT`
//! 3. **TOML config file** - Values from the configuration file
//! 4. **Built-in defaults** - Hardcoded default values
//!
//! The web root has no default and must be provided. The composer root
//! defaults to the web root.
//!
//! For console arguments, CLI `--console-arg` values **replace** the TOML
//! `console.args` list entirely (not merged).

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
