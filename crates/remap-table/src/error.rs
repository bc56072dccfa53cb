use thiserror::Error;

use remap_overrides::OverrideError;
use remap_reconcile::ReconcileError;
use remap_types::Category;

/// A category whose table has unmapped entries but no configured fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackViolation {
    /// The offending category.
    pub category: Category,
    /// Number of unmapped entries in its table.
    pub unmapped: u32,
}

impl std::fmt::Display for FallbackViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} unmapped entries and no fallback configured",
            self.category, self.unmapped
        )
    }
}

/// Errors that can occur while building the composite mapping document.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The builder configuration document could not be parsed.
    #[error("malformed build configuration: {reason}")]
    Config { reason: String },

    /// Override validation failed.
    #[error(transparent)]
    Overrides(#[from] OverrideError),

    /// One or more categories failed to reconcile. Every failing category
    /// is reported so all defects can be fixed in one pass.
    #[error("reconciliation failed:\n{}", format_errors(.0))]
    Reconcile(Vec<ReconcileError>),

    /// Categories with unmapped entries but no configured fallback. An
    /// unresolvable runtime lookup with no fallback is a correctness gap.
    #[error("{} category(ies) missing a fallback:\n{}", .0.len(), format_violations(.0))]
    MissingFallback(Vec<FallbackViolation>),

    /// A configured fallback index is outside the target registry.
    #[error("{category}: fallback {fallback} out of bounds for {mapped_size} target identifiers")]
    InvalidFallback {
        category: Category,
        fallback: u32,
        mapped_size: u32,
    },
}

fn format_errors(errors: &[ReconcileError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_violations(violations: &[FallbackViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convenience alias for build results.
pub type BuildResult<T> = Result<T, BuildError>;
