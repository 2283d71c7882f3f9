//! Recursive merging of configuration values.

use serde_json::{Map, Value};

/// Merges `overlay` on top of `base`.
///
/// When both values are mappings the result holds every key of both: keys
/// present on both sides are merged recursively, keys of `base` keep their
/// position, and keys only in `overlay` are appended in overlay order. In
/// every other case `overlay` replaces `base` entirely, including sequences,
/// type mismatches and `null`.
#[must_use]
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            merge_into(&mut base, overlay);
            Value::Object(base)
        }
        (_, overlay) => overlay,
    }
}

fn merge_into(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, overlay_value) in overlay {
        match base.get_mut(&key) {
            Some(base_value) => {
                let merged = deep_merge(base_value.take(), overlay_value);
                *base_value = merged;
            }
            None => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Folds layers into one value, starting from an empty mapping.
///
/// An empty iterator yields an empty mapping.
#[must_use]
pub fn merge_layers<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers
        .into_iter()
        .fold(Value::Object(Map::new()), deep_merge)
}
