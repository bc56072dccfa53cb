use serde::{Deserialize, Serialize};
use tracing::warn;

/// What to do when a source identifier ends up unmapped with no override.
///
/// Deliberate drops (override rules) are never subject to the strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStrategy {
    /// Accept silently. For categories where gaps are expected.
    Ignore,
    /// Log a warning and accept.
    #[default]
    Warn,
    /// Abort reconciliation, reporting every unmapped identifier.
    Error,
}

impl ErrorStrategy {
    /// Apply the non-fatal side of the strategy to one unmapped identifier.
    pub fn apply(self, category: &str, key: &str) {
        if self == Self::Warn {
            warn!(category, key, "no mapping found");
        }
    }

    /// Returns `true` if unmapped identifiers abort the run.
    pub fn is_fatal(self) -> bool {
        self == Self::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_warn() {
        assert_eq!(ErrorStrategy::default(), ErrorStrategy::Warn);
    }

    #[test]
    fn only_error_is_fatal() {
        assert!(!ErrorStrategy::Ignore.is_fatal());
        assert!(!ErrorStrategy::Warn.is_fatal());
        assert!(ErrorStrategy::Error.is_fatal());
    }

    #[test]
    fn serde_lowercase() {
        let s: ErrorStrategy = serde_json::from_str("\"ignore\"").unwrap();
        assert_eq!(s, ErrorStrategy::Ignore);
    }
}
