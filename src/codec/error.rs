//! Error type for encoding and decoding configuration values.

use thiserror::Error;

/// Error type for the configuration text formats.
///
/// Parse errors for the hand-written parsers carry the byte offset where
/// parsing stopped.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The YAML document could not be parsed.
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The PHP array literal could not be parsed.
    #[error("Invalid PHP literal at byte {offset}: {reason}")]
    Literal {
        /// Byte offset of the offending input
        offset: usize,
        /// What was expected or found
        reason: String,
    },

    /// The PHP serialized string could not be decoded.
    #[error("Invalid serialized value at byte {offset}: {reason}")]
    Serialized {
        /// Byte offset of the offending input
        offset: usize,
        /// What was expected or found
        reason: String,
    },
}

impl CodecError {
    pub(crate) fn literal(offset: usize, reason: impl Into<String>) -> Self {
        Self::Literal {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn serialized(offset: usize, reason: impl Into<String>) -> Self {
        Self::Serialized {
            offset,
            reason: reason.into(),
        }
    }
}
