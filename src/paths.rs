//! Locations of the files the tool reads and writes.

use std::path::{Path, PathBuf};

/// Directory below the web root holding the generated files.
const TYPO3CONF_DIR: &str = "typo3conf";

/// Directory below the composer root holding the layer files.
const CONF_DIR: &str = "conf";

/// File name of the generated configuration.
const LOCAL_CONFIGURATION: &str = "LocalConfiguration.php";

/// File name of the scaffolded additional configuration.
const ADDITIONAL_CONFIGURATION: &str = "AdditionalConfiguration.php";

/// File name of the extracted extension settings store.
const EXTENSION_STORE: &str = "config.extension.yml";

/// Root directories of a TYPO3 project.
///
/// `root` is the web root containing `typo3conf/`, `composer_root` the
/// directory containing `composer.json` and `conf/`. In many projects both are
/// the same directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
    composer_root: PathBuf,
}

impl ProjectPaths {
    /// Creates project paths from the two root directories.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, composer_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            composer_root: composer_root.into(),
        }
    }

    /// Web root of the installation.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root of the composer project.
    #[must_use]
    pub fn composer_root(&self) -> &Path {
        &self.composer_root
    }

    /// `<root>/typo3conf/LocalConfiguration.php`
    #[must_use]
    pub fn local_configuration(&self) -> PathBuf {
        self.root.join(TYPO3CONF_DIR).join(LOCAL_CONFIGURATION)
    }

    /// `<root>/typo3conf/AdditionalConfiguration.php`
    #[must_use]
    pub fn additional_configuration(&self) -> PathBuf {
        self.root.join(TYPO3CONF_DIR).join(ADDITIONAL_CONFIGURATION)
    }

    /// `<composer_root>/conf`
    #[must_use]
    pub fn conf_dir(&self) -> PathBuf {
        self.composer_root.join(CONF_DIR)
    }

    /// `<composer_root>/conf/config.extension.yml`
    #[must_use]
    pub fn extension_store(&self) -> PathBuf {
        self.conf_dir().join(EXTENSION_STORE)
    }
}
