//! Text formats for configuration values.
//!
//! This module provides:
//! - PHP array literal encoding and parsing ([`php`])
//! - YAML parsing and Symfony-style dumping ([`yaml`])
//! - Decoding of PHP `serialize()` output ([`serialized`])
//!
//! All formats share the same value model: [`serde_json::Value`] with
//! insertion-ordered mappings.

mod error;
pub mod php;
pub mod serialized;
pub mod yaml;

#[cfg(test)]
mod test_fixtures;

pub use error::CodecError;

use serde_json::{Map, Value};

/// Key of a PHP array entry.
///
/// PHP arrays are ordered maps whose keys are either integers or strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArrayKey {
    Int(i64),
    Str(String),
}

/// Assembles PHP array entries into a configuration value.
///
/// An array whose keys are all integers counting up from zero becomes a
/// sequence; anything else becomes a mapping with string keys. Entries pushed
/// without a key receive the next free integer index, as PHP does.
#[derive(Debug, Default)]
pub(crate) struct ArrayBuilder {
    entries: Map<String, Value>,
    string_keys: bool,
    next_index: i64,
}

impl ArrayBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: Option<ArrayKey>, value: Value) {
        let key = match key {
            Some(ArrayKey::Str(key)) => {
                self.string_keys = true;
                key
            }
            Some(ArrayKey::Int(index)) => {
                if index >= self.next_index {
                    self.next_index = index.saturating_add(1);
                }
                index.to_string()
            }
            None => {
                let index = self.next_index;
                self.next_index = index.saturating_add(1);
                index.to_string()
            }
        };
        self.entries.insert(key, value);
    }

    pub(crate) fn finish(self) -> Value {
        let is_list = !self.string_keys
            && self
                .entries
                .keys()
                .enumerate()
                .all(|(position, key)| *key == position.to_string());

        if is_list && !self.entries.is_empty() {
            Value::Array(self.entries.into_iter().map(|(_, value)| value).collect())
        } else {
            Value::Object(self.entries)
        }
    }
}

/// Renders a float in its shortest round-trip form, always with a decimal
/// point so PHP and YAML both read it back as a float.
pub(crate) fn float_literal(value: f64) -> String {
    let text = format!("{value:?}");
    if text.contains('.') {
        return text;
    }
    match text.find(['e', 'E']) {
        Some(exponent) => format!("{}.0{}", &text[..exponent], &text[exponent..]),
        None => format!("{text}.0"),
    }
}
