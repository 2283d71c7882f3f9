//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Project locations
    #[serde(default)]
    pub paths: PathsSection,

    /// Application context
    #[serde(default)]
    pub context: ContextSection,

    /// Console used for sub-commands
    #[serde(default)]
    pub console: ConsoleSection,

    /// Development scaffold
    #[serde(default)]
    pub scaffold: ScaffoldSection,
}

/// Project locations section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Web root containing `typo3conf/`
    pub root: Option<PathBuf>,

    /// Composer root containing `conf/`
    pub composer_root: Option<PathBuf>,
}

/// Application context section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextSection {
    /// Context name, e.g. `Production/Staging`
    pub name: Option<String>,
}

/// Console section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSection {
    /// Console binary
    pub binary: Option<PathBuf>,

    /// Arguments placed before every sub-command
    pub args: Option<Vec<String>>,
}

/// Scaffold section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaffoldSection {
    /// Template installed as `AdditionalConfiguration.php`
    pub template: Option<PathBuf>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# typo3-config-handling configuration file
# CLI arguments and the TYPO3_* environment variables take precedence.

[paths]
# Web root containing typo3conf/ (required, or TYPO3_PATH_ROOT)
# root = "public"

# Composer root containing conf/ (default: the web root, or TYPO3_PATH_COMPOSER_ROOT)
# composer_root = "."

[context]
# Application context (default: Production, or TYPO3_CONTEXT)
# Production contexts compile conf/config.prod.yml, all others conf/config.dev.yml
# name = "Production"

[console]
# Console binary used to remove extracted settings (default: vendor/bin/typo3cms)
# Relative paths with a directory part are resolved against the composer root
# binary = "vendor/bin/typo3cms"

# Arguments placed before every sub-command
# Note: CLI --console-arg values REPLACE these entirely (not merged)
# args = []

[scaffold]
# Template installed as typo3conf/AdditionalConfiguration.php by `dump`
# without --no-dev (default: the built-in scaffold)
# template = "conf/AdditionalConfiguration.php.dist"
"#
    .to_string()
}
