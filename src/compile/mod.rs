//! Compilation of the generated `LocalConfiguration.php`.
//!
//! In production mode the layers of the active context are resolved and
//! written into the generated file as one PHP array literal. In development
//! mode the generated file returns an empty array and a scaffolded
//! `AdditionalConfiguration.php` resolves the layers at runtime instead.
//!
//! A generated file that was edited by hand is never overwritten blindly:
//! its extension settings are extracted through the dispatcher first.

mod error;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use error::CompileError;

use std::borrow::Cow;
use std::path::PathBuf;

use crate::codec::php;
use crate::context::ApplicationContext;
use crate::dispatch::CommandDispatcher;
use crate::generated::{header, is_auto_generated, write_atomic};
use crate::layers::ConfigLoader;
use crate::paths::ProjectPaths;

/// Scaffold shipped with the tool.
pub const EMBEDDED_SCAFFOLD: &str = include_str!("../../res/AdditionalConfiguration.php");

/// Source of the `AdditionalConfiguration.php` installed in development mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScaffoldTemplate {
    /// The scaffold shipped with the tool.
    #[default]
    Embedded,
    /// A project specific template file.
    File(PathBuf),
}

impl ScaffoldTemplate {
    /// Returns the template contents.
    ///
    /// # Errors
    ///
    /// Returns an error if a template file cannot be read.
    pub fn contents(&self) -> Result<Cow<'static, str>, CompileError> {
        match self {
            Self::Embedded => Ok(Cow::Borrowed(EMBEDDED_SCAFFOLD)),
            Self::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| CompileError::TemplateRead {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// What a dump wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpOutcome {
    /// The resolved configuration was written into the generated file.
    Compiled {
        /// Whether a system-owned scaffold was deleted
        scaffold_removed: bool,
    },
    /// An empty generated file was written and the scaffold installed.
    Scaffolded,
}

/// Writes the generated configuration of a project.
#[derive(Debug)]
pub struct Compiler<'a, D: ?Sized> {
    paths: &'a ProjectPaths,
    context: &'a ApplicationContext,
    dispatcher: &'a D,
    scaffold: ScaffoldTemplate,
}

impl<'a, D> Compiler<'a, D>
where
    D: CommandDispatcher + ?Sized,
{
    /// Creates a compiler using the embedded scaffold.
    #[must_use]
    pub fn new(paths: &'a ProjectPaths, context: &'a ApplicationContext, dispatcher: &'a D) -> Self {
        Self {
            paths,
            context,
            dispatcher,
            scaffold: ScaffoldTemplate::Embedded,
        }
    }

    /// Replaces the scaffold installed in development mode.
    #[must_use]
    pub fn with_scaffold(mut self, scaffold: ScaffoldTemplate) -> Self {
        self.scaffold = scaffold;
        self
    }

    /// Writes `LocalConfiguration.php`.
    ///
    /// With `production_mode` the resolved configuration for the context's
    /// layer is compiled into the file and a system-owned scaffold is
    /// removed. Otherwise the file returns an empty array and the scaffold is
    /// installed. Unchanged layers produce a byte-identical file.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction of a hand-edited file fails, the
    /// layers cannot be loaded, or a file cannot be written or removed.
    pub fn dump(&self, production_mode: bool) -> Result<DumpOutcome, CompileError> {
        let local = self.paths.local_configuration();
        if local.exists() && !is_auto_generated(&local) {
            tracing::info!(
                "{} was edited by hand, extracting extension settings first",
                local.display()
            );
            self.dispatcher.extract_settings()?;
        }

        let mut content = header();
        let outcome = if production_mode {
            let literal = self.compile()?;
            let scaffold_removed = self.remove_scaffold()?;
            content.push_str("return ");
            content.push_str(&literal);
            content.push_str(";\n");
            DumpOutcome::Compiled { scaffold_removed }
        } else {
            self.install_scaffold()?;
            content.push_str("return [];\n");
            DumpOutcome::Scaffolded
        };

        write_atomic(&local, &content).map_err(|source| CompileError::Write {
            path: local.clone(),
            source,
        })?;
        tracing::info!("Wrote {}", local.display());
        Ok(outcome)
    }

    fn compile(&self) -> Result<String, CompileError> {
        let layer = self.context.layer_name();
        tracing::debug!("Compiling layer '{layer}' for context {}", self.context);
        let configuration = ConfigLoader::new(self.paths.conf_dir(), layer).load()?;
        Ok(php::encode(&configuration))
    }

    fn remove_scaffold(&self) -> Result<bool, CompileError> {
        let scaffold = self.paths.additional_configuration();
        if !is_auto_generated(&scaffold) {
            return Ok(false);
        }
        std::fs::remove_file(&scaffold).map_err(|source| CompileError::ScaffoldRemove {
            path: scaffold.clone(),
            source,
        })?;
        tracing::info!("Removed {}", scaffold.display());
        Ok(true)
    }

    fn install_scaffold(&self) -> Result<(), CompileError> {
        let scaffold = self.paths.additional_configuration();
        let template = self.scaffold.contents()?;
        write_atomic(&scaffold, &template).map_err(|source| CompileError::ScaffoldWrite {
            path: scaffold.clone(),
            source,
        })?;
        tracing::info!("Installed {}", scaffold.display());
        Ok(())
    }
}
