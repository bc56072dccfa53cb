//! Assembles reconciliation results for every configured category into one
//! composite mapping document.
//!
//! Categories never influence each other's matching, so they reconcile on
//! independent worker threads against the shared read-only override store.
//! Results are joined in declared category order before aggregation, so
//! output never depends on thread scheduling.

use std::collections::BTreeMap;

use tracing::{debug, info};

use remap_overrides::{OverrideError, OverrideStore, UnresolvedRule};
use remap_reconcile::{override_stubs, reconcile, ReconcileRequest};
use remap_registry::Registry;
use remap_types::{Category, DocumentMeta, MappingDocument};

use crate::config::{BuildConfig, CategoryConfig};
use crate::error::{BuildError, BuildResult, FallbackViolation};

/// The two registries bridged by one category's reconciliation.
#[derive(Clone, Debug)]
pub struct RegistryPair {
    /// Registry at the source version.
    pub source: Registry,
    /// Registry at the target version.
    pub target: Registry,
}

/// Build the composite mapping document for one version pair.
///
/// Overrides are validated up front against every registry pair they
/// bridge; reconciliation errors, unresolved rules, and missing fallbacks
/// are each collected across all categories before the run aborts, so one
/// edit-and-rerun cycle fixes every defect.
pub fn build(
    config: &BuildConfig,
    meta: DocumentMeta,
    pairs: &BTreeMap<Category, RegistryPair>,
    overrides: &OverrideStore,
) -> BuildResult<MappingDocument> {
    let jobs: Vec<(&CategoryConfig, &RegistryPair)> = config
        .categories
        .iter()
        .filter_map(|category| match pairs.get(&category.name) {
            Some(pair) => Some((category, pair)),
            None => {
                debug!(category = %category.name, "no registry pair, skipped");
                None
            }
        })
        .collect();

    validate_overrides(config, &jobs, overrides)?;

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|(category, pair)| {
                let request = ReconcileRequest {
                    category: &category.name,
                    source: &pair.source,
                    target: &pair.target,
                    overrides,
                    normalization: category.normalization,
                    strategy: category.strategy,
                };
                scope.spawn(move || reconcile(&request))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let mut failures = Vec::new();
    let mut tables = Vec::new();
    for ((category, _), result) in jobs.iter().zip(results) {
        match result {
            Ok(table) => tables.push((*category, table)),
            Err(err) => failures.push(err),
        }
    }
    if !failures.is_empty() {
        return Err(BuildError::Reconcile(failures));
    }

    let mut document = MappingDocument::new(meta);
    let mut violations = Vec::new();
    for (category, table) in tables {
        let stats = table.stats();
        let table = match category.fallback {
            Some(fallback) => {
                if fallback >= stats.mapped_size {
                    return Err(BuildError::InvalidFallback {
                        category: category.name.clone(),
                        fallback,
                        mapped_size: stats.mapped_size,
                    });
                }
                table.with_fallback(fallback)
            }
            None => {
                if stats.empty_mappings > 0 {
                    violations.push(FallbackViolation {
                        category: category.name.clone(),
                        unmapped: stats.empty_mappings,
                    });
                }
                table
            }
        };

        if category.store_identifiers {
            let pair = &pairs[&category.name];
            document
                .identifiers
                .insert(category.name.clone(), pair.target.keys().to_vec());
        }
        document.tables.insert(category.name.clone(), table);
    }
    if !violations.is_empty() {
        return Err(BuildError::MissingFallback(violations));
    }

    info!(
        source = %document.meta.source_version,
        target = %document.meta.target_version,
        categories = document.tables.len(),
        "built mapping document"
    );
    Ok(document)
}

/// Collect override stubs for every configured category: the source keys a
/// maintainer still has to map, keyed by category.
pub fn collect_stubs(
    config: &BuildConfig,
    pairs: &BTreeMap<Category, RegistryPair>,
    overrides: &OverrideStore,
) -> BTreeMap<Category, Vec<String>> {
    let mut stubs = BTreeMap::new();
    for category in &config.categories {
        let Some(pair) = pairs.get(&category.name) else {
            continue;
        };
        let request = ReconcileRequest {
            category: &category.name,
            source: &pair.source,
            target: &pair.target,
            overrides,
            normalization: category.normalization,
            strategy: category.strategy,
        };
        let keys = override_stubs(&request);
        if !keys.is_empty() {
            stubs.insert(category.name.clone(), keys);
        }
    }
    stubs
}

/// Validate every override rule against the registries it bridges, plus
/// rules for categories the run does not configure at all. All unresolved
/// rules are reported together.
fn validate_overrides(
    config: &BuildConfig,
    jobs: &[(&CategoryConfig, &RegistryPair)],
    overrides: &OverrideStore,
) -> BuildResult<()> {
    let mut unresolved = Vec::new();
    for (category, pair) in jobs {
        unresolved.extend(overrides.validate_for(&category.name, &pair.source, &pair.target));
    }

    let configured: Vec<&Category> = config.categories.iter().map(|c| &c.name).collect();
    for category in overrides.categories() {
        if !configured.contains(&category) {
            unresolved.push(UnresolvedRule {
                category: category.clone(),
                source_key: "*".into(),
                reason: format!("{} rule(s) for an unconfigured category", overrides.rule_count(category)),
            });
        }
    }

    if unresolved.is_empty() {
        Ok(())
    } else {
        Err(BuildError::Overrides(OverrideError::Unresolved {
            rules: unresolved,
        }))
    }
}
