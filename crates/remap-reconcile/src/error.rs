use thiserror::Error;

use remap_types::Category;

/// A normalized-form collision hit by a source lookup.
///
/// Names every colliding target key so the maintainer can resolve the whole
/// conflict set with overrides in one pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ambiguity {
    /// Source key whose lookup fell through to the collided form.
    pub source_key: String,
    /// The normalized form the target keys collapse onto.
    pub normalized: String,
    /// All target keys sharing the normalized form.
    pub candidates: Vec<String>,
}

impl std::fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} normalizes to {:?}, matched by: {}",
            self.source_key,
            self.normalized,
            self.candidates.join(", ")
        )
    }
}

/// Errors that can occur during reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Normalized matching collapsed two or more target keys onto the same
    /// form. Ambiguity is never resolved by picking the first match; every
    /// collision found across the registry is reported at once.
    #[error("{category}: {} ambiguous match(es):\n{}", .ambiguities.len(), format_list(.ambiguities))]
    Ambiguous {
        category: Category,
        ambiguities: Vec<Ambiguity>,
    },

    /// Source identifiers ended up unmapped while the category's error
    /// strategy demands a full mapping.
    #[error("{category}: {} identifier(s) have no mapping:\n{}", .keys.len(), format_list(.keys))]
    Unmapped { category: Category, keys: Vec<String> },
}

fn format_list<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("  {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convenience alias for reconciliation results.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
