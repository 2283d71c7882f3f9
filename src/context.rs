//! Application context of a TYPO3 installation.
//!
//! A context is a root context (`Production`, `Development` or `Testing`)
//! optionally followed by sub-contexts, e.g. `Production/Staging`. The root
//! context decides which configuration layer applies.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Layer name used for production contexts.
pub const PRODUCTION_LAYER: &str = "prod";

/// Layer name used for every other context.
pub const DEVELOPMENT_LAYER: &str = "dev";

/// Root of an application context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootContext {
    /// Live systems.
    Production,
    /// Local and shared development systems.
    Development,
    /// Automated test runs.
    Testing,
}

impl RootContext {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Development => "Development",
            Self::Testing => "Testing",
        }
    }
}

/// A parsed application context such as `Production/Staging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationContext {
    root: RootContext,
    sub_contexts: Vec<String>,
}

impl ApplicationContext {
    /// Creates a context without sub-contexts.
    #[must_use]
    pub const fn new(root: RootContext) -> Self {
        Self {
            root,
            sub_contexts: Vec::new(),
        }
    }

    /// Returns the root context.
    #[must_use]
    pub const fn root(&self) -> RootContext {
        self.root
    }

    /// Returns the sub-contexts, outermost first.
    #[must_use]
    pub fn sub_contexts(&self) -> &[String] {
        &self.sub_contexts
    }

    /// Returns `true` for `Production` and all of its sub-contexts.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self.root, RootContext::Production)
    }

    /// Returns the name of the configuration layer for this context.
    #[must_use]
    pub const fn layer_name(&self) -> &'static str {
        if self.is_production() {
            PRODUCTION_LAYER
        } else {
            DEVELOPMENT_LAYER
        }
    }
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self::new(RootContext::Production)
    }
}

impl fmt::Display for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root.as_str())?;
        for sub_context in &self.sub_contexts {
            write!(f, "/{sub_context}")?;
        }
        Ok(())
    }
}

/// Error returned when a context string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid application context '{value}': {reason}")]
pub struct ParseContextError {
    /// The rejected input
    pub value: String,
    /// Why it was rejected
    pub reason: &'static str,
}

impl FromStr for ApplicationContext {
    type Err = ParseContextError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let error = |reason| ParseContextError {
            value: value.to_string(),
            reason,
        };

        let mut segments = value.split('/');
        let root = match segments.next().map(str::trim) {
            Some("Production") => RootContext::Production,
            Some("Development") => RootContext::Development,
            Some("Testing") => RootContext::Testing,
            _ => {
                return Err(error(
                    "must start with Production, Development or Testing",
                ));
            }
        };

        let sub_contexts = segments
            .map(|segment| {
                let segment = segment.trim();
                if segment.is_empty() {
                    Err(error("sub-contexts must not be empty"))
                } else {
                    Ok(segment.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { root, sub_contexts })
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
