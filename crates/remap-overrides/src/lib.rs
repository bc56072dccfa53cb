//! Override rules for remap.
//!
//! Holds manually curated rename/alias rules and identifiers to force-map
//! or force-exclude for one (source version, target version) pair. Rules
//! take precedence over automatic matching and are never second-guessed by
//! the reconciliation engine.

pub mod error;
pub mod rules;
pub mod store;

pub use error::{OverrideError, OverrideResult, UnresolvedRule};
pub use rules::OverrideAction;
pub use store::OverrideStore;
