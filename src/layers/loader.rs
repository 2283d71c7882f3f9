//! Loading of the resolved configuration.

use std::path::PathBuf;

use serde_json::Value;

use super::{LayerError, LayerResolver, merge_layers};

/// Loads the resolved configuration for one context.
///
/// Every call re-reads the layer files; nothing is cached.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    resolver: LayerResolver,
    context: String,
}

impl ConfigLoader {
    /// Creates a loader for the layers in `conf_dir` and the given context.
    #[must_use]
    pub fn new(conf_dir: impl Into<PathBuf>, context: impl Into<String>) -> Self {
        Self {
            resolver: LayerResolver::new(conf_dir),
            context: context.into(),
        }
    }

    /// Resolves the layers and folds them into one value.
    ///
    /// With no layer files present the result is an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns any [`LayerError`] raised while resolving the layers.
    pub fn load(&self) -> Result<Value, LayerError> {
        let layers = self.resolver.resolve(&self.context)?;
        tracing::debug!(
            "Merging {} layer(s) for context '{}'",
            layers.len(),
            self.context
        );
        Ok(merge_layers(layers.into_iter().map(|layer| layer.value)))
    }
}
