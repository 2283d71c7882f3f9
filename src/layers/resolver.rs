//! Discovery and reading of the layer files for a context.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::LayerError;
use crate::codec::yaml;

/// File name (without extension) of the base layer.
const BASE_NAME: &str = "config";

/// Extension shared by all layer files.
const EXTENSION: &str = "yml";

/// Top-level key listing further files to load before a layer.
const IMPORTS_KEY: &str = "imports";

static CONTEXT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("context name pattern is valid")
});

/// One configuration layer read from a YAML file.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// File stem of the layer, e.g. `config.prod`.
    pub name: String,
    /// Path the layer was read from.
    pub path: PathBuf,
    /// Top-level mapping of the layer, without its `imports` key.
    pub value: Value,
}

/// Finds the layers that apply to a context.
///
/// The base layer `config.yml` comes first, the context overlay
/// `config.<context>.yml` second. Either may be absent. Files named in a
/// layer's `imports` key are resolved relative to that layer and placed
/// before it, so the importing file wins.
#[derive(Debug, Clone)]
pub struct LayerResolver {
    conf_dir: PathBuf,
}

impl LayerResolver {
    /// Creates a resolver reading layers from `conf_dir`.
    #[must_use]
    pub fn new(conf_dir: impl Into<PathBuf>) -> Self {
        Self {
            conf_dir: conf_dir.into(),
        }
    }

    /// Returns the path of the overlay file for `context`.
    #[must_use]
    pub fn overlay_path(&self, context: &str) -> PathBuf {
        self.conf_dir
            .join(format!("{BASE_NAME}.{context}.{EXTENSION}"))
    }

    /// Returns the path of the base layer file.
    #[must_use]
    pub fn base_path(&self) -> PathBuf {
        self.conf_dir.join(format!("{BASE_NAME}.{EXTENSION}"))
    }

    /// Resolves the ordered layer list for `context`.
    ///
    /// # Errors
    ///
    /// Returns an error if the context name is invalid, a layer cannot be
    /// read or parsed, a layer is not a mapping, or an import is missing or
    /// cyclic.
    pub fn resolve(&self, context: &str) -> Result<Vec<Layer>, LayerError> {
        if !CONTEXT_NAME.is_match(context) {
            return Err(LayerError::InvalidContextName {
                name: context.to_string(),
            });
        }

        let mut layers = Vec::new();
        for path in [self.base_path(), self.overlay_path(context)] {
            if path.is_file() {
                collect(&path, &mut Vec::new(), &mut layers)?;
            } else {
                tracing::debug!("Layer {} not present, skipping", path.display());
            }
        }
        Ok(layers)
    }
}

/// Reads `path` and its imports depth first, appending them to `layers`.
///
/// `stack` holds the canonical paths of the layers currently being imported.
fn collect(path: &Path, stack: &mut Vec<PathBuf>, layers: &mut Vec<Layer>) -> Result<(), LayerError> {
    let canonical = std::fs::canonicalize(path).map_err(|source| LayerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    if stack.contains(&canonical) {
        return Err(LayerError::ImportCycle {
            path: path.to_path_buf(),
        });
    }

    let mut mapping = read_mapping(path)?;
    let imports = take_imports(path, &mut mapping)?;

    stack.push(canonical);
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    for import in imports {
        let import_path = base_dir.join(import);
        if !import_path.is_file() {
            return Err(LayerError::MissingImport {
                path: import_path,
                imported_from: path.to_path_buf(),
            });
        }
        collect(&import_path, stack, layers)?;
    }
    stack.pop();

    tracing::debug!("Loaded layer {}", path.display());
    layers.push(Layer {
        name: layer_name(path),
        path: path.to_path_buf(),
        value: Value::Object(mapping),
    });
    Ok(())
}

fn read_mapping(path: &Path) -> Result<Map<String, Value>, LayerError> {
    let content = std::fs::read_to_string(path).map_err(|source| LayerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value = yaml::parse(&content).map_err(|source| LayerError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(mapping) => Ok(mapping),
        Value::Null => Ok(Map::new()),
        _ => Err(LayerError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Removes the `imports` key from a layer and returns the file names it lists.
///
/// Entries are either plain file names or mappings with a `resource` key.
fn take_imports(path: &Path, mapping: &mut Map<String, Value>) -> Result<Vec<String>, LayerError> {
    let invalid = |reason: String| LayerError::InvalidImport {
        path: path.to_path_buf(),
        reason,
    };

    let entries = match mapping.shift_remove(IMPORTS_KEY) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(invalid("expected a list of files".to_string())),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::String(file) => Ok(file),
            Value::Object(mut resource) => match resource.shift_remove("resource") {
                Some(Value::String(file)) => Ok(file),
                _ => Err(invalid(format!("entry {index} has no 'resource' file name"))),
            },
            _ => Err(invalid(format!(
                "entry {index} must be a file name or a mapping with a 'resource' key"
            ))),
        })
        .collect()
}

fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
