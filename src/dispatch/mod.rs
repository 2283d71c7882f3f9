//! Sub-commands the core delegates to.
//!
//! The compiler and the extractor only need two operations from the
//! surrounding console: extracting extension settings and removing a
//! configuration subtree from the generated file. [`CommandDispatcher`] names
//! exactly these two, so both can be driven by [`ConsoleDispatcher`] in
//! production and by [`mock::MockDispatcher`] in tests.

mod console;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use console::{ConsoleCommand, ConsoleDispatcher};

use std::path::PathBuf;

use thiserror::Error;

use crate::extract::ExtractError;

/// Errors raised while dispatching a sub-command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The console binary could not be started.
    #[error("Failed to run '{}': {source}", program.display())]
    Spawn {
        /// Program that was started
        program: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The console binary ran and reported failure.
    #[error("Command '{command}' failed with {status}: {stderr}")]
    Failed {
        /// Full command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// Extracting extension settings failed.
    #[error("Failed to extract extension settings: {0}")]
    Extract(#[source] Box<ExtractError>),
}

impl From<ExtractError> for DispatchError {
    fn from(error: ExtractError) -> Self {
        Self::Extract(Box::new(error))
    }
}

/// Runs the sub-commands used during compilation and extraction.
///
/// # Testing
///
/// Use [`mock::MockDispatcher`] in tests to record calls instead of running
/// an external console.
pub trait CommandDispatcher {
    /// Extracts extension settings from a hand-edited generated file into
    /// the settings store (`settings:extract`).
    ///
    /// # Errors
    ///
    /// Returns an error if the extraction fails.
    fn extract_settings(&self) -> Result<(), DispatchError>;

    /// Removes the given top-level paths from the generated configuration
    /// (`configuration:remove`).
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be run or fails.
    fn remove_configuration(&self, paths: &[&str], force: bool) -> Result<(), DispatchError>;
}
