//! Override rule actions and their document encoding.
//!
//! In the raw document a rule value is a plain string:
//!
//! - `"new_key"` — rename: map to the target identifier with this key
//! - `"id:17"` — map directly to target index 17
//! - `""` — drop: deliberately unmapped, no warning
//!
//! A rule keyed by a bare base name (no `[` suffix) also matches stateful
//! source identifiers of the form `base[properties]`; a rename target ending
//! in `[` re-appends the source's properties.

use crate::error::{OverrideError, OverrideResult};

/// Prefix marking a direct target-index rule value.
const ID_PREFIX: &str = "id:";

/// The action an override rule prescribes for a source identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverrideAction {
    /// Map to the target identifier with this key.
    Rename(String),
    /// Map directly to this target index.
    Index(u32),
    /// Deliberately unmapped.
    Drop,
}

impl OverrideAction {
    /// Parse a rule value from its document string form.
    pub fn parse(source_key: &str, value: &str) -> OverrideResult<Self> {
        if value.is_empty() {
            return Ok(Self::Drop);
        }
        if let Some(id) = value.strip_prefix(ID_PREFIX) {
            let index = id.parse().map_err(|_| OverrideError::Malformed {
                reason: format!("{source_key}: invalid direct id value {value:?}"),
            })?;
            return Ok(Self::Index(index));
        }
        Ok(Self::Rename(value.to_string()))
    }
}

/// Split a stateful identifier `base[properties]` into its base name and
/// properties suffix. Returns `None` for plain identifiers.
pub(crate) fn split_state(key: &str) -> Option<(&str, &str)> {
    let bracket = key.find('[')?;
    Some((&key[..bracket], &key[bracket + 1..]))
}

/// Resolve a wildcard rename target against the matched source identifier,
/// re-appending the source properties when the target ends in `[`.
pub(crate) fn expand_wildcard(action: &OverrideAction, properties: &str) -> OverrideAction {
    match action {
        OverrideAction::Rename(target) if target.ends_with('[') => {
            OverrideAction::Rename(format!("{target}{properties}"))
        }
        other => other.clone(),
    }
}
