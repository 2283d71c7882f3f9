//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

/// Default application context when neither CLI, environment nor config file
/// name one.
pub const CONTEXT: &str = "Production";

/// Default console binary, relative to the composer root.
pub const CONSOLE_BINARY: &str = "vendor/bin/typo3cms";

/// Default output path of the `init` command.
pub const CONFIG_FILE: &str = "typo3-config-handling.toml";
