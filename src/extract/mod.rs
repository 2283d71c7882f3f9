//! Extraction of extension settings from a hand-edited generated file.
//!
//! Before TYPO3 configuration was managed in layer files, extension settings
//! lived in `LocalConfiguration.php` under `EXT/extConf`, one legacy encoded
//! string per extension. [`Extractor`] moves them into the declarative store
//! `conf/config.extension.yml`:
//!
//! 1. Read the `return [...];` mapping of the generated file
//! 2. Decode each entry of `EXT/extConf`
//! 3. Merge the decoded settings into `EXT.extConf.<extension>` of the store
//! 4. Write the store
//! 5. Ask the dispatcher to remove `EXT` from the generated file
//!
//! Existing store entries of extensions not present in the legacy file are
//! kept. Decoding happens before anything is written, so a decode failure
//! leaves every file untouched.

mod error;
mod legacy;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use error::ExtractError;
pub use legacy::{LegacyDecoder, Lookup, SerializedDecoder, lookup_path, remove_typoscript_dots};

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::codec::{php, yaml};
use crate::dispatch::CommandDispatcher;
use crate::generated::{is_auto_generated, write_atomic};
use crate::layers::deep_merge;
use crate::paths::ProjectPaths;

/// Inline level used when writing the store.
pub const STORE_INLINE_LEVEL: usize = 5;

/// Path of the extension settings inside the generated configuration.
pub const EXT_CONF_PATH: &str = "EXT/extConf";

/// Top-level path removed from the generated file after extraction.
const REMOVED_PATH: &str = "EXT";

/// Result of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The generated file does not exist.
    NoFileToExtract,
    /// The generated file is system-owned; there is nothing hand-edited.
    AlreadyGenerated,
    /// Settings of the listed extensions were moved into the store.
    Extracted {
        /// Extension keys in file order
        extensions: Vec<String>,
    },
    /// The generated file has no extension settings.
    NothingFound,
}

/// Moves legacy extension settings into the settings store.
#[derive(Debug)]
pub struct Extractor<'a, D: ?Sized, L = SerializedDecoder> {
    local_configuration: PathBuf,
    store: PathBuf,
    dispatcher: &'a D,
    decoder: L,
}

impl<'a, D> Extractor<'a, D>
where
    D: CommandDispatcher + ?Sized,
{
    /// Creates an extractor for explicit file locations.
    #[must_use]
    pub fn new(
        local_configuration: impl Into<PathBuf>,
        store: impl Into<PathBuf>,
        dispatcher: &'a D,
    ) -> Self {
        Self {
            local_configuration: local_configuration.into(),
            store: store.into(),
            dispatcher,
            decoder: SerializedDecoder,
        }
    }

    /// Creates an extractor for the standard locations of a project.
    #[must_use]
    pub fn for_project(paths: &ProjectPaths, dispatcher: &'a D) -> Self {
        Self::new(paths.local_configuration(), paths.extension_store(), dispatcher)
    }
}

impl<'a, D, L> Extractor<'a, D, L>
where
    D: CommandDispatcher + ?Sized,
    L: LegacyDecoder,
{
    /// Replaces the decoder used for legacy settings strings.
    #[must_use]
    pub fn with_decoder<M: LegacyDecoder>(self, decoder: M) -> Extractor<'a, D, M> {
        Extractor {
            local_configuration: self.local_configuration,
            store: self.store,
            dispatcher: self.dispatcher,
            decoder,
        }
    }

    /// Runs the extraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated file, the store or a legacy value
    /// cannot be read, if the store cannot be written, or if the dispatcher
    /// fails to remove the extracted settings. In the last case the store
    /// has already been written.
    pub fn extract(&self) -> Result<ExtractionOutcome, ExtractError> {
        let path = &self.local_configuration;
        if !path.exists() {
            tracing::warn!("{} does not exist. Nothing to extract", path.display());
            return Ok(ExtractionOutcome::NoFileToExtract);
        }
        if is_auto_generated(path) {
            tracing::info!("{} is already generated. Nothing to extract", path.display());
            return Ok(ExtractionOutcome::AlreadyGenerated);
        }

        let blob = read_blob(path)?;
        let Lookup::Found(Value::Object(ext_conf)) = lookup_path(&blob, EXT_CONF_PATH) else {
            tracing::warn!("No extension settings were found");
            return Ok(ExtractionOutcome::NothingFound);
        };

        let decoded = ext_conf
            .iter()
            .map(|(extension, raw)| {
                self.decode(extension, raw)
                    .map(|settings| (extension.clone(), settings))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let extensions: Vec<String> = decoded.iter().map(|(key, _)| key.clone()).collect();

        let mut store = self.load_store()?;
        merge_into_store(&mut store, decoded);

        let contents = yaml::dump(&Value::Object(store), STORE_INLINE_LEVEL);
        write_atomic(&self.store, &contents).map_err(|source| ExtractError::StoreWrite {
            path: self.store.clone(),
            source,
        })?;
        tracing::info!("Extracted extension settings to {}", self.store.display());

        self.dispatcher.remove_configuration(&[REMOVED_PATH], true)?;

        Ok(ExtractionOutcome::Extracted { extensions })
    }

    fn decode(&self, extension: &str, raw: &Value) -> Result<Value, ExtractError> {
        let unsupported = |kind| ExtractError::UnsupportedLegacyValue {
            extension: extension.to_string(),
            kind,
        };

        let settings = match raw {
            Value::Object(_) => raw.clone(),
            Value::String(text) => {
                self.decoder
                    .decode(text)
                    .map_err(|source| ExtractError::LegacyDecode {
                        extension: extension.to_string(),
                        source,
                    })?
            }
            other => return Err(unsupported(kind_of(other))),
        };

        if settings.is_object() {
            Ok(remove_typoscript_dots(settings))
        } else {
            Err(unsupported(kind_of(&settings)))
        }
    }

    fn load_store(&self) -> Result<Map<String, Value>, ExtractError> {
        let path = &self.store;
        if !path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ExtractError::StoreRead {
            path: path.clone(),
            source,
        })?;
        match yaml::parse(&content) {
            Ok(Value::Object(store)) => Ok(store),
            Ok(Value::Null) => Ok(Map::new()),
            Ok(_) => Err(ExtractError::StoreNotMapping { path: path.clone() }),
            Err(source) => Err(ExtractError::Store {
                path: path.clone(),
                source,
            }),
        }
    }
}

fn read_blob(path: &Path) -> Result<Value, ExtractError> {
    let content = std::fs::read_to_string(path).map_err(|source| ExtractError::BlobRead {
        path: path.to_path_buf(),
        source,
    })?;
    php::parse_return_file(&content).map_err(|source| ExtractError::Blob {
        path: path.to_path_buf(),
        source,
    })
}

/// Merges decoded settings into `EXT.extConf.<extension>` of the store.
///
/// Missing or non-mapping intermediate entries are replaced by empty
/// mappings; the positions of existing keys are kept.
fn merge_into_store(store: &mut Map<String, Value>, decoded: Vec<(String, Value)>) {
    let mut ext = take_object(store, "EXT");
    let mut ext_conf = take_object(&mut ext, "extConf");

    for (extension, settings) in decoded {
        let current = take_object(&mut ext_conf, &extension);
        ext_conf.insert(extension, deep_merge(Value::Object(current), settings));
    }

    ext.insert("extConf".to_string(), Value::Object(ext_conf));
    store.insert("EXT".to_string(), Value::Object(ext));
}

/// Takes the mapping stored under `key`, leaving a placeholder in its place.
fn take_object(map: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match map.get_mut(key).map(Value::take) {
        Some(Value::Object(inner)) => inner,
        _ => Map::new(),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
