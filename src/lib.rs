//! typo3-config-handling: layered configuration for TYPO3
//!
//! A library for compiling layered YAML configuration into a generated
//! `LocalConfiguration.php` and for moving extension settings out of
//! hand-edited ones into a declarative store.

pub mod codec;
pub mod compile;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod extract;
pub mod generated;
pub mod layers;
pub mod paths;
