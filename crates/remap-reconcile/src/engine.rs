//! The reconciliation engine: computes one category's mapping table from a
//! registry pair and the applicable overrides.
//!
//! For each source record, in index order:
//!
//! 1. an override rule wins unconditionally (rename, direct index, or drop),
//! 2. otherwise an exact key match against the target registry,
//! 3. otherwise a normalized match (superficial renames),
//! 4. otherwise the entry is unmapped.
//!
//! All inputs are immutable and all iteration is in index or sorted order,
//! so fixed inputs always produce the identical table.

use tracing::debug;

use remap_overrides::{OverrideAction, OverrideStore};
use remap_registry::Registry;
use remap_types::{Category, CategoryTable};

use crate::error::{Ambiguity, ReconcileError, ReconcileResult};
use crate::normalize::{Normalization, NormalizedIndex, NormalizedMatch};
use crate::strategy::ErrorStrategy;

/// Everything the engine needs to reconcile one category.
#[derive(Clone, Copy, Debug)]
pub struct ReconcileRequest<'a> {
    pub category: &'a Category,
    pub source: &'a Registry,
    pub target: &'a Registry,
    pub overrides: &'a OverrideStore,
    pub normalization: Normalization,
    pub strategy: ErrorStrategy,
}

/// Reconcile a source registry against a target registry.
///
/// The resulting table covers every source index exactly once; every mapped
/// entry is a valid target index. Ambiguities and (under
/// [`ErrorStrategy::Error`]) unmapped identifiers are collected across the
/// whole registry before the engine fails, so one run surfaces every defect.
pub fn reconcile(request: &ReconcileRequest<'_>) -> ReconcileResult<CategoryTable> {
    let normalized = if request.normalization.is_noop() {
        None
    } else {
        Some(NormalizedIndex::build(request.target, &request.normalization))
    };

    let mut entries = Vec::with_capacity(request.source.len());
    let mut ambiguities = Vec::new();
    let mut unmatched = Vec::new();

    for (_, key) in request.source.iter() {
        let entry = match resolve(request, normalized.as_ref(), key, &mut ambiguities) {
            Resolution::Mapped(target) => Some(target),
            Resolution::Dropped => None,
            Resolution::Unmatched => {
                request.strategy.apply(request.category.as_str(), key);
                unmatched.push(key.to_string());
                None
            }
        };
        entries.push(entry);
    }

    if !ambiguities.is_empty() {
        return Err(ReconcileError::Ambiguous {
            category: request.category.clone(),
            ambiguities,
        });
    }
    if request.strategy.is_fatal() && !unmatched.is_empty() {
        return Err(ReconcileError::Unmapped {
            category: request.category.clone(),
            keys: unmatched,
        });
    }

    let table = CategoryTable::new(entries, request.target.len() as u32);
    let stats = table.stats();
    debug!(
        category = %request.category,
        size = stats.size,
        mapped_size = stats.mapped_size,
        identity = stats.identity_mappings,
        empty = stats.empty_mappings,
        "reconciled category"
    );
    Ok(table)
}

/// Source keys that would end up unmapped with no override: the stub list a
/// maintainer fills in to complete the override file.
///
/// Ambiguous keys are included, since they need an override just the same.
/// Keys an override already handles (including deliberate drops) are not.
pub fn override_stubs(request: &ReconcileRequest<'_>) -> Vec<String> {
    let normalized = if request.normalization.is_noop() {
        None
    } else {
        Some(NormalizedIndex::build(request.target, &request.normalization))
    };

    let mut stubs = Vec::new();
    for (_, key) in request.source.iter() {
        if request.overrides.lookup(request.category, key).is_some() {
            continue;
        }
        let mut sink = Vec::new();
        if !matches!(
            resolve(request, normalized.as_ref(), key, &mut sink),
            Resolution::Mapped(_)
        ) {
            stubs.push(key.to_string());
        }
    }
    stubs
}

enum Resolution {
    Mapped(u32),
    Dropped,
    Unmatched,
}

fn resolve(
    request: &ReconcileRequest<'_>,
    normalized: Option<&NormalizedIndex>,
    key: &str,
    ambiguities: &mut Vec<Ambiguity>,
) -> Resolution {
    // Overrides are never second-guessed: a rename whose target is missing
    // stays unmapped rather than falling through to automatic matching.
    if let Some(action) = request.overrides.lookup(request.category, key) {
        return match action {
            OverrideAction::Rename(target_key) => match request.target.index_of(&target_key) {
                Some(index) => Resolution::Mapped(index),
                None => Resolution::Unmatched,
            },
            OverrideAction::Index(index) => {
                // An out-of-range direct id must not leak into the table.
                if (index as usize) < request.target.len() {
                    Resolution::Mapped(index)
                } else {
                    Resolution::Unmatched
                }
            }
            OverrideAction::Drop => Resolution::Dropped,
        };
    }

    if let Some(index) = request.target.index_of(key) {
        return Resolution::Mapped(index);
    }

    if let Some(index) = normalized {
        let form = request.normalization.apply(key);
        match index.lookup(&form) {
            NormalizedMatch::Unique(target) => return Resolution::Mapped(target),
            NormalizedMatch::Collided(candidates) => {
                ambiguities.push(Ambiguity {
                    source_key: key.to_string(),
                    normalized: form,
                    candidates,
                });
                return Resolution::Unmatched;
            }
            NormalizedMatch::None => {}
        }
    }

    Resolution::Unmatched
}
