//! Dispatcher backed by the project's console binary.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::{CommandDispatcher, DispatchError};
use crate::extract::{ExtractionOutcome, Extractor};
use crate::paths::ProjectPaths;

/// Name of the console command removing configuration paths.
const REMOVE_COMMAND: &str = "configuration:remove";

/// Console binary and the arguments placed before every sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ConsoleCommand {
    /// Creates a console command.
    ///
    /// A relative `program` containing a directory part (such as
    /// `vendor/bin/typo3cms`) is resolved against the composer root when run;
    /// a bare name is looked up on `PATH`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Returns the configured program.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the leading arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub(super) fn resolve_program(&self, composer_root: &Path) -> PathBuf {
        let is_bare_name = self.program.components().count() == 1;
        if self.program.is_absolute() || is_bare_name {
            self.program.clone()
        } else {
            composer_root.join(&self.program)
        }
    }
}

impl fmt::Display for ConsoleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Production [`CommandDispatcher`].
///
/// Extraction runs in-process; removal of configuration paths is delegated to
/// the console binary, run from the composer root.
#[derive(Debug, Clone)]
pub struct ConsoleDispatcher {
    paths: ProjectPaths,
    console: ConsoleCommand,
}

impl ConsoleDispatcher {
    /// Creates a dispatcher for the given project.
    #[must_use]
    pub const fn new(paths: ProjectPaths, console: ConsoleCommand) -> Self {
        Self { paths, console }
    }
}

impl CommandDispatcher for ConsoleDispatcher {
    fn extract_settings(&self) -> Result<(), DispatchError> {
        let outcome = Extractor::for_project(&self.paths, self).extract()?;
        if let ExtractionOutcome::Extracted { extensions } = &outcome {
            tracing::debug!("Extracted settings of {} extension(s)", extensions.len());
        }
        Ok(())
    }

    fn remove_configuration(&self, paths: &[&str], force: bool) -> Result<(), DispatchError> {
        let program = self.console.resolve_program(self.paths.composer_root());

        let mut command = Command::new(&program);
        command
            .args(&self.console.args)
            .arg(REMOVE_COMMAND)
            .arg(format!("--paths={}", paths.join(",")))
            .current_dir(self.paths.composer_root());
        if force {
            command.arg("--force");
        }

        let description = format!("{command:?}");
        tracing::debug!("Running {description}");

        let output = command
            .output()
            .map_err(|source| DispatchError::Spawn { program, source })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(DispatchError::Failed {
                command: description,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
