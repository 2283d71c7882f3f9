//! Decoding of legacy extension settings.

use serde_json::{Map, Value};

use crate::codec::{CodecError, serialized};

/// Decodes the string an extension's settings were stored as.
pub trait LegacyDecoder {
    /// Decodes `raw` into a configuration value.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not in the expected format.
    fn decode(&self, raw: &str) -> Result<Value, CodecError>;
}

/// Decodes PHP `serialize()` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializedDecoder;

impl LegacyDecoder for SerializedDecoder {
    fn decode(&self, raw: &str) -> Result<Value, CodecError> {
        serialized::unserialize(raw)
    }
}

/// Strips the TypoScript trailing dots from keys of nested collections.
///
/// `{"storage.": {"path": "/x"}}` becomes `{"storage": {"path": "/x"}}`.
/// Keys of scalar values are kept. When a stripped key collides with an
/// existing one, the later entry wins and keeps the earlier position.
#[must_use]
pub fn remove_typoscript_dots(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                if child.is_object() || child.is_array() {
                    out.insert(key.trim_end_matches('.').to_string(), remove_typoscript_dots(child));
                } else {
                    out.insert(key, child);
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(remove_typoscript_dots).collect()),
        scalar => scalar,
    }
}

/// Result of looking up a path in a configuration value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The path exists.
    Found(&'a Value),
    /// Some segment of the path does not exist.
    NotFound,
}

/// Looks up a `/` separated path such as `EXT/extConf`.
///
/// Segments index mappings by key and sequences by position.
#[must_use]
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Lookup<'a> {
    let mut current = value;
    for segment in path.split('/') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
            _ => None,
        };
        match next {
            Some(child) => current = child,
            None => return Lookup::NotFound,
        }
    }
    Lookup::Found(current)
}
