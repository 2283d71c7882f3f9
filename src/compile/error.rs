//! Error type for compiling the generated configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::layers::LayerError;

/// Error type for the `dump` operation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Extracting settings from a hand-edited file failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The configuration layers could not be loaded.
    #[error(transparent)]
    Layers(#[from] LayerError),

    /// Failed to read a configured scaffold template.
    #[error("Failed to read scaffold template '{}': {source}", path.display())]
    TemplateRead {
        /// Path to the template
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to install the scaffold file.
    #[error("Failed to write '{}': {source}", path.display())]
    ScaffoldWrite {
        /// Path to the scaffold file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete the system-owned scaffold file.
    #[error("Failed to remove '{}': {source}", path.display())]
    ScaffoldRemove {
        /// Path to the scaffold file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the generated configuration.
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        /// Path to the generated file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
