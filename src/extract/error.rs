//! Error type for extension settings extraction.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;
use crate::dispatch::DispatchError;

/// Error type for extracting extension settings.
///
/// Every variant aborts the extraction. Variants raised before the store is
/// written leave all files untouched.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Failed to read the hand-edited generated file.
    #[error("Failed to read '{}': {source}", path.display())]
    BlobRead {
        /// Path to the generated file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The hand-edited generated file is not a plain `return [...];` file.
    #[error("Failed to parse '{}': {source}", path.display())]
    Blob {
        /// Path to the generated file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: CodecError,
    },

    /// Failed to read the extension settings store.
    #[error("Failed to read extension settings '{}': {source}", path.display())]
    StoreRead {
        /// Path to the store
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The extension settings store is not valid YAML.
    #[error("Failed to parse extension settings '{}': {source}", path.display())]
    Store {
        /// Path to the store
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: CodecError,
    },

    /// The extension settings store does not hold a mapping.
    #[error("Extension settings '{}' must contain a mapping at the top level", path.display())]
    StoreNotMapping {
        /// Path to the store
        path: PathBuf,
    },

    /// Failed to write the extension settings store.
    #[error("Failed to write extension settings '{}': {source}", path.display())]
    StoreWrite {
        /// Path to the store
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The legacy settings string of an extension could not be decoded.
    #[error("Failed to decode settings of extension '{extension}': {source}")]
    LegacyDecode {
        /// Extension key
        extension: String,
        /// Underlying decode error
        #[source]
        source: CodecError,
    },

    /// The legacy settings of an extension are neither a string nor a mapping.
    #[error("Settings of extension '{extension}' are {kind}, expected a mapping")]
    UnsupportedLegacyValue {
        /// Extension key
        extension: String,
        /// Kind of value found
        kind: &'static str,
    },

    /// Removing the extracted settings from the generated file failed.
    ///
    /// The store has already been written when this is returned.
    #[error("Failed to remove extracted settings: {0}")]
    Remove(#[from] DispatchError),
}
