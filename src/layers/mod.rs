//! Layered configuration sources.
//!
//! This module provides:
//! - Recursive merging of configuration values ([`deep_merge`], [`merge_layers`])
//! - Discovery of the active layer files for a context ([`LayerResolver`])
//! - Loading of the resolved configuration ([`ConfigLoader`])
//!
//! # Layer Order
//!
//! For context `prod` the layers are, first to last:
//!
//! 1. Files imported by `config.yml` (recursively, imports first)
//! 2. `config.yml`
//! 3. Files imported by `config.prod.yml`
//! 4. `config.prod.yml`
//!
//! Later layers override earlier ones key by key.

mod error;
mod loader;
mod merge;
mod resolver;

#[cfg(test)]
mod loader_tests;

pub use error::LayerError;
pub use loader::ConfigLoader;
pub use merge::{deep_merge, merge_layers};
pub use resolver::{Layer, LayerResolver};
