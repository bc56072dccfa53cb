use thiserror::Error;

use remap_types::Category;

/// A single override rule that could not be resolved against the registries
/// it claims to bridge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedRule {
    /// Category the rule belongs to.
    pub category: Category,
    /// Source key the rule applies to.
    pub source_key: String,
    /// Why the rule is unresolved.
    pub reason: String,
}

impl std::fmt::Display for UnresolvedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}: {}", self.category, self.source_key, self.reason)
    }
}

/// Errors that can occur while loading or validating overrides.
#[derive(Debug, Error)]
pub enum OverrideError {
    /// The override document could not be parsed into the expected shape.
    #[error("malformed override document: {reason}")]
    Malformed { reason: String },

    /// One or more rules reference identifiers that exist in neither of the
    /// registries they claim to bridge. Stale rules hide real mapping bugs,
    /// so every one is reported rather than silently dropped.
    #[error("{} unresolved override rule(s):\n{}", .rules.len(), format_rules(.rules))]
    Unresolved { rules: Vec<UnresolvedRule> },
}

fn format_rules(rules: &[UnresolvedRule]) -> String {
    rules
        .iter()
        .map(|r| format!("  {r}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convenience alias for override results.
pub type OverrideResult<T> = Result<T, OverrideError>;
