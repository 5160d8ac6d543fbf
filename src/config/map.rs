//! Merged configuration mapping.
//!
//! Config sources are YAML documents of top-level key/value pairs. Sources
//! are merged in input order and later sources overwrite earlier keys.
//! Values stay as parsed YAML until a template parameter asks for them.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{ConfigError, Result};

/// The merged key/value mapping built from all config sources.
#[derive(Debug, Clone, Default)]
pub struct ConfigMap {
    values: HashMap<String, serde_yaml::Value>,
}

impl ConfigMap {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML document and merges its top-level entries into the
    /// mapping, overwriting existing keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or its top
    /// level is not a mapping.
    pub fn merge_document(&mut self, uri: &str, content: &str) -> Result<()> {
        let document: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::load_failed(uri, format!("{e}")))?;

        let serde_yaml::Value::Mapping(mapping) = document else {
            return Err(ConfigError::load_failed(uri, "top level is not a mapping").into());
        };

        for (key, value) in mapping {
            let Some(key) = key.as_str() else {
                warn!("Skipping non-string key in {uri}");
                continue;
            };
            self.values.insert(key.to_string(), value);
        }

        Ok(())
    }

    /// Returns true if the mapping contains the given key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of keys in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no keys have been merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolves the value under `key` to a parameter string.
    ///
    /// Strings pass through unchanged. Numbers and booleans render with
    /// their YAML text form. Sequences of scalars join with commas (the
    /// provider's list-parameter format). Mappings and other shapes have
    /// no parameter representation and resolve to `None` with a warning.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<String> {
        let value = self.values.get(key)?;
        match scalar_text(value) {
            Some(text) => Some(text),
            None => {
                if let serde_yaml::Value::Sequence(items) = value {
                    let mut parts = Vec::with_capacity(items.len());
                    for item in items {
                        match scalar_text(item) {
                            Some(text) => parts.push(text),
                            None => {
                                warn!("Config key '{key}' has a non-scalar list item, skipping");
                                return None;
                            }
                        }
                    }
                    Some(parts.join(","))
                } else {
                    warn!("Config key '{key}' has no parameter representation, skipping");
                    None
                }
            }
        }
    }
}

/// Renders a scalar YAML value as its parameter text, or `None` for
/// non-scalar values.
fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
