//! Strict parsing of raw registry documents.
//!
//! External data enters the pipeline here and is converted into the fixed
//! [`Registry`] shape immediately; nothing downstream ever inspects
//! loosely-typed data. Two raw forms are accepted:
//!
//! - an array of identifier strings, indexed positionally, and
//! - an object keyed by decimal index (the sparse legacy dump form), which
//!   must still describe a contiguous 0..N-1 range.

use serde_json::Value;
use tracing::debug;

use remap_types::Category;

use crate::error::{RegistryError, RegistryResult};
use crate::registry::Registry;

/// Options applied while converting raw keys into registry records.
#[derive(Clone, Debug, Default)]
pub struct LoaderOptions {
    /// Namespace prefix stripped from every key (e.g. `"minecraft:"`), so
    /// dumps with and without namespaces reconcile identically.
    pub strip_namespace: Option<String>,
}

impl LoaderOptions {
    fn apply(&self, key: &str) -> String {
        match &self.strip_namespace {
            Some(ns) => key.strip_prefix(ns.as_str()).unwrap_or(key).to_string(),
            None => key.to_string(),
        }
    }
}

/// Parse a registry from a JSON array of identifier strings.
pub fn from_json(raw: &str, options: &LoaderOptions) -> RegistryResult<Registry> {
    let value: Value = parse(raw)?;
    registry_from_value(&value, options)
}

/// Parse a registry from a JSON object keyed by decimal index.
pub fn from_indexed_json(raw: &str, options: &LoaderOptions) -> RegistryResult<Registry> {
    let value: Value = parse(raw)?;
    indexed_registry_from_value(&value, options)
}

/// Convert an already-parsed JSON value into a registry.
///
/// Arrays use positional indices; objects are treated as the index-keyed
/// legacy form. Anything else is malformed.
pub fn registry_from_value(value: &Value, options: &LoaderOptions) -> RegistryResult<Registry> {
    match value {
        Value::Array(elements) => {
            let mut keys = Vec::with_capacity(elements.len());
            for (i, element) in elements.iter().enumerate() {
                let key = element.as_str().ok_or_else(|| RegistryError::Malformed {
                    reason: format!("entry {i} is not a string"),
                })?;
                keys.push(options.apply(key));
            }
            Registry::from_keys(keys)
        }
        Value::Object(_) => indexed_registry_from_value(value, options),
        other => Err(RegistryError::Malformed {
            reason: format!("expected array or object, got {}", type_name(other)),
        }),
    }
}

fn indexed_registry_from_value(value: &Value, options: &LoaderOptions) -> RegistryResult<Registry> {
    let object = value.as_object().ok_or_else(|| RegistryError::Malformed {
        reason: format!("expected object, got {}", type_name(value)),
    })?;

    let mut slots: Vec<Option<String>> = vec![None; object.len()];
    for (raw_index, element) in object {
        let index: usize = raw_index.parse().map_err(|_| RegistryError::Malformed {
            reason: format!("non-numeric index key: {raw_index:?}"),
        })?;
        let key = element.as_str().ok_or_else(|| RegistryError::Malformed {
            reason: format!("entry {raw_index} is not a string"),
        })?;
        let slot = slots.get_mut(index).ok_or_else(|| RegistryError::Malformed {
            reason: format!("index {index} out of bounds for {} entries", object.len()),
        })?;
        if slot.is_some() {
            return Err(RegistryError::Malformed {
                reason: format!("duplicate index: {index}"),
            });
        }
        *slot = Some(options.apply(key));
    }

    // Every slot filled means the indices are exactly 0..N-1.
    let keys: Vec<String> = slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.ok_or_else(|| RegistryError::Malformed {
                reason: format!("missing index: {i}"),
            })
        })
        .collect::<RegistryResult<_>>()?;
    Registry::from_keys(keys)
}

/// A parsed per-version registry document holding one raw registry per
/// category, as produced by the data-collection step.
#[derive(Clone, Debug)]
pub struct VersionDocument {
    root: serde_json::Map<String, Value>,
}

impl VersionDocument {
    /// Parse a version document from its JSON text.
    pub fn from_str(raw: &str) -> RegistryResult<Self> {
        let value: Value = parse(raw)?;
        let root = match value {
            Value::Object(map) => map,
            other => {
                return Err(RegistryError::Malformed {
                    reason: format!("expected top-level object, got {}", type_name(&other)),
                })
            }
        };
        Ok(Self { root })
    }

    /// Returns `true` if the document carries the category.
    pub fn contains(&self, category: &Category) -> bool {
        self.root.contains_key(category.as_str())
    }

    /// Load the registry for a category.
    ///
    /// Returns `Ok(None)` when the document does not carry the category at
    /// all; a present-but-malformed registry is an error.
    pub fn registry(
        &self,
        category: &Category,
        options: &LoaderOptions,
    ) -> RegistryResult<Option<Registry>> {
        let Some(value) = self.root.get(category.as_str()) else {
            return Ok(None);
        };
        let registry =
            registry_from_value(value, options).map_err(|e| prefix_category(category, e))?;
        debug!(category = %category, size = registry.len(), "loaded registry");
        Ok(Some(registry))
    }
}

fn prefix_category(category: &Category, err: RegistryError) -> RegistryError {
    match err {
        RegistryError::Malformed { reason } => RegistryError::Malformed {
            reason: format!("{category}: {reason}"),
        },
        other => other,
    }
}

fn parse(raw: &str) -> RegistryResult<Value> {
    serde_json::from_str(raw).map_err(|e| RegistryError::Malformed {
        reason: format!("invalid JSON: {e}"),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> LoaderOptions {
        LoaderOptions::default()
    }

    #[test]
    fn array_form() {
        let r = from_json(r#"["stone", "dirt", "grass_block"]"#, &options()).unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r.key(2), Some("grass_block"));
    }

    #[test]
    fn array_form_rejects_non_string() {
        let err = from_json(r#"["stone", 3]"#, &options()).unwrap_err();
        assert!(matches!(err, RegistryError::Malformed { .. }));
    }

    #[test]
    fn indexed_form_orders_numerically() {
        // Lexicographic key order would put "10" before "2".
        let raw = r#"{"10":"j","0":"a","1":"b","2":"c","3":"d","4":"e","5":"f","6":"g","7":"h","8":"i","9":"x"}"#;
        let r = from_indexed_json(raw, &options()).unwrap();
        assert_eq!(r.len(), 11);
        assert_eq!(r.key(2), Some("c"));
        assert_eq!(r.key(10), Some("j"));
    }

    #[test]
    fn indexed_form_rejects_gap() {
        let err = from_indexed_json(r#"{"0":"a","2":"b"}"#, &options()).unwrap_err();
        assert!(matches!(err, RegistryError::Malformed { .. }));
    }

    #[test]
    fn indexed_form_rejects_non_numeric_index() {
        let err = from_indexed_json(r#"{"zero":"a"}"#, &options()).unwrap_err();
        assert!(matches!(err, RegistryError::Malformed { .. }));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = from_json("not json", &options()).unwrap_err();
        assert!(matches!(err, RegistryError::Malformed { .. }));
    }

    #[test]
    fn duplicate_key_surfaces() {
        let err = from_json(r#"["stone", "stone"]"#, &options()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateKey { .. }));
    }

    #[test]
    fn namespace_stripping() {
        let opts = LoaderOptions {
            strip_namespace: Some("minecraft:".into()),
        };
        let r = from_json(r#"["minecraft:stone", "other:dirt"]"#, &opts).unwrap();
        assert_eq!(r.key(0), Some("stone"));
        // Foreign namespaces are left alone.
        assert_eq!(r.key(1), Some("other:dirt"));
    }

    #[test]
    fn version_document_per_category() {
        let doc = VersionDocument::from_str(
            r#"{"blocks": ["stone"], "items": ["stick", "stone"]}"#,
        )
        .unwrap();
        let blocks = doc
            .registry(&Category::new("blocks"), &options())
            .unwrap()
            .unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(doc
            .registry(&Category::new("sounds"), &options())
            .unwrap()
            .is_none());
    }

    #[test]
    fn version_document_malformed_category_named_in_error() {
        let doc = VersionDocument::from_str(r#"{"blocks": 7}"#).unwrap();
        let err = doc
            .registry(&Category::new("blocks"), &options())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("blocks"), "got: {message}");
    }
}
