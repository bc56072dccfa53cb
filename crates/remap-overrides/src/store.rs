//! The override store: eagerly loaded, read-only rule lookup for one
//! (source version, target version) pair.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::debug;

use remap_registry::Registry;
use remap_types::Category;

use crate::error::{OverrideError, OverrideResult, UnresolvedRule};
use crate::rules::{expand_wildcard, split_state, OverrideAction};

/// Manually curated override rules for one version pair, keyed by category.
///
/// Overrides are the only way to force a mapping the automatic matcher would
/// refuse or get wrong. They are loaded once per run and never modified.
#[derive(Clone, Debug, Default)]
pub struct OverrideStore {
    rules: BTreeMap<Category, BTreeMap<String, OverrideAction>>,
}

impl OverrideStore {
    /// An empty store (no overrides configured for the version pair).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse an override document from its JSON text.
    ///
    /// The document shape is `{ "<category>": { "<source key>": "<value>" } }`.
    pub fn from_json(raw: &str) -> OverrideResult<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|e| OverrideError::Malformed {
            reason: format!("invalid JSON: {e}"),
        })?;
        let root = value.as_object().ok_or_else(|| OverrideError::Malformed {
            reason: "expected top-level object".into(),
        })?;

        let mut rules = BTreeMap::new();
        for (category, entries) in root {
            let entries = entries.as_object().ok_or_else(|| OverrideError::Malformed {
                reason: format!("{category}: expected object of rules"),
            })?;
            let mut set = BTreeMap::new();
            for (source_key, value) in entries {
                let value = value.as_str().ok_or_else(|| OverrideError::Malformed {
                    reason: format!("{category}/{source_key}: rule value is not a string"),
                })?;
                set.insert(source_key.clone(), OverrideAction::parse(source_key, value)?);
            }
            debug!(category, rules = set.len(), "loaded overrides");
            rules.insert(Category::new(category.clone()), set);
        }
        Ok(Self { rules })
    }

    /// Look up the action for a source key in a category.
    ///
    /// An exact rule wins; otherwise a stateful identifier `base[props]`
    /// falls back to a wildcard rule keyed by its base name.
    pub fn lookup(&self, category: &Category, source_key: &str) -> Option<OverrideAction> {
        let set = self.rules.get(category)?;
        if let Some(action) = set.get(source_key) {
            return Some(action.clone());
        }
        let (base, properties) = split_state(source_key)?;
        let action = set.get(base)?;
        Some(expand_wildcard(action, properties))
    }

    /// Categories that carry at least one rule.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.rules.keys()
    }

    /// Number of rules for a category.
    pub fn rule_count(&self, category: &Category) -> usize {
        self.rules.get(category).map_or(0, BTreeMap::len)
    }

    /// Validate every rule of a category against the registry pair it
    /// bridges.
    ///
    /// A rule is unresolved when it references identifiers that exist in
    /// neither registry: its source key (or wildcard base) matches nothing
    /// in the source registry, and its target matches nothing in the target
    /// registry. All unresolved rules are returned so a maintainer can fix
    /// the whole set in one pass.
    pub fn validate_for(
        &self,
        category: &Category,
        source: &Registry,
        target: &Registry,
    ) -> Vec<UnresolvedRule> {
        let Some(set) = self.rules.get(category) else {
            return Vec::new();
        };

        let source_bases = base_names(source);
        let target_bases = base_names(target);

        let mut unresolved = Vec::new();
        for (source_key, action) in set {
            let source_known =
                source.contains_key(source_key) || source_bases.contains(source_key.as_str());
            let target_known = match action {
                OverrideAction::Rename(target_key) => {
                    let base = target_key.strip_suffix('[').unwrap_or(target_key.as_str());
                    target.contains_key(base) || target_bases.contains(base)
                }
                OverrideAction::Index(index) => (*index as usize) < target.len(),
                // A drop references only its source identifier.
                OverrideAction::Drop => false,
            };
            if !source_known && !target_known {
                unresolved.push(UnresolvedRule {
                    category: category.clone(),
                    source_key: source_key.clone(),
                    reason: reason_for(action),
                });
            }
        }
        unresolved
    }
}

fn reason_for(action: &OverrideAction) -> String {
    match action {
        OverrideAction::Rename(target) => format!(
            "source key not in source registry and target {target:?} not in target registry"
        ),
        OverrideAction::Index(index) => format!(
            "source key not in source registry and index {index} out of bounds"
        ),
        OverrideAction::Drop => "source key not in source registry".into(),
    }
}

/// Base names (identifier up to any `[` suffix) present in a registry, for
/// wildcard resolution.
fn base_names(registry: &Registry) -> BTreeSet<&str> {
    registry
        .keys()
        .iter()
        .filter_map(|k| split_state(k).map(|(base, _)| base))
        .collect()
}
