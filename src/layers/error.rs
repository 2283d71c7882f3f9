//! Error type for layer resolution and loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Error type for reading configuration layers.
///
/// Every variant is fatal: a configuration that cannot be fully read is
/// never partially applied.
#[derive(Debug, Error)]
pub enum LayerError {
    /// Failed to read a layer file.
    #[error("Failed to read layer '{}': {source}", path.display())]
    FileRead {
        /// Path to the layer file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A layer file is not valid YAML.
    #[error("Failed to parse layer '{}': {source}", path.display())]
    Parse {
        /// Path to the layer file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: CodecError,
    },

    /// The document root of a layer is not a mapping.
    #[error("Layer '{}' must contain a mapping at the top level", path.display())]
    NotAMapping {
        /// Path to the layer file
        path: PathBuf,
    },

    /// The `imports` key of a layer has an unexpected shape.
    #[error("Invalid imports in layer '{}': {reason}", path.display())]
    InvalidImport {
        /// Path to the importing layer
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// An imported file does not exist.
    #[error("Imported layer '{}' does not exist (imported from '{}')", path.display(), imported_from.display())]
    MissingImport {
        /// Path of the missing file
        path: PathBuf,
        /// Layer that declared the import
        imported_from: PathBuf,
    },

    /// A layer imports itself, directly or through other layers.
    #[error("Import cycle detected at layer '{}'", path.display())]
    ImportCycle {
        /// Layer that closes the cycle
        path: PathBuf,
    },

    /// The context name cannot be used as part of a file name.
    #[error("Invalid context name '{name}': expected letters, digits, '-' or '_'")]
    InvalidContextName {
        /// The rejected name
        name: String,
    },
}
