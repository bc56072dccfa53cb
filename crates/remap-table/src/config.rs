//! Builder configuration.
//!
//! The category list, per-category fallbacks, and normalization profiles
//! are explicit configuration threaded through the build call, never read
//! from ambient state, so generation runs stay reproducible and testable
//! in isolation.

use serde::{Deserialize, Serialize};

use remap_reconcile::{ErrorStrategy, Normalization};
use remap_types::Category;

use crate::error::{BuildError, BuildResult};

/// Configuration for one registry category.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name, matching the key in the registry documents.
    pub name: Category,
    /// Default target index substituted at runtime for unmapped entries.
    #[serde(default)]
    pub fallback: Option<u32>,
    /// What to do with identifiers that end up unmapped with no override.
    #[serde(default)]
    pub strategy: ErrorStrategy,
    /// Normalized-matching profile for superficial renames.
    #[serde(default)]
    pub normalization: Normalization,
    /// Embed the target registry's full key list in the output document.
    #[serde(default)]
    pub store_identifiers: bool,
}

impl CategoryConfig {
    /// A config with defaults for the given category name.
    pub fn new(name: impl Into<Category>) -> Self {
        Self {
            name: name.into(),
            fallback: None,
            strategy: ErrorStrategy::default(),
            normalization: Normalization::default(),
            store_identifiers: false,
        }
    }

    /// Set the fallback target index.
    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl From<&str> for CategoryConfig {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Configuration for one full generation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Namespace prefix stripped from raw registry keys at load time.
    #[serde(default)]
    pub strip_namespace: Option<String>,
    /// Categories to reconcile, in declared order.
    pub categories: Vec<CategoryConfig>,
}

impl BuildConfig {
    /// Parse a configuration document from its JSON text.
    pub fn from_json(raw: &str) -> BuildResult<Self> {
        serde_json::from_str(raw).map_err(|e| BuildError::Config {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_document() {
        let config = BuildConfig::from_json(r#"{"categories": [{"name": "blocks"}]}"#).unwrap();
        assert_eq!(config.categories.len(), 1);
        let category = &config.categories[0];
        assert_eq!(category.name.as_str(), "blocks");
        assert_eq!(category.fallback, None);
        assert_eq!(category.strategy, ErrorStrategy::Warn);
        assert!(category.normalization.case_fold);
        assert!(!category.store_identifiers);
    }

    #[test]
    fn full_document() {
        let config = BuildConfig::from_json(
            r#"{
                "strip_namespace": "minecraft:",
                "categories": [
                    {
                        "name": "blockstates",
                        "fallback": 1,
                        "strategy": "error",
                        "normalization": {"case_fold": true, "strip_punctuation": false},
                        "store_identifiers": true
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.strip_namespace.as_deref(), Some("minecraft:"));
        let category = &config.categories[0];
        assert_eq!(category.fallback, Some(1));
        assert_eq!(category.strategy, ErrorStrategy::Error);
        assert!(!category.normalization.strip_punctuation);
        assert!(category.store_identifiers);
    }

    #[test]
    fn invalid_document_is_config_error() {
        let err = BuildConfig::from_json(r#"{"categories": "all"}"#).unwrap_err();
        assert!(matches!(err, BuildError::Config { .. }));
    }
}
