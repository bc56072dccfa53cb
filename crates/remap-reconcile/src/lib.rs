//! Reconciliation engine for remap.
//!
//! Matches every identifier of a source registry to its closest valid
//! equivalent in a target registry: override rules first (never
//! second-guessed), then exact key match, then a configurable normalized
//! match for superficial renames, and finally the unmapped sentinel.
//! Deterministic by construction: no unordered iteration anywhere.

pub mod engine;
pub mod error;
pub mod normalize;
pub mod strategy;

pub use engine::{override_stubs, reconcile, ReconcileRequest};
pub use error::{Ambiguity, ReconcileError, ReconcileResult};
pub use normalize::{Normalization, NormalizedIndex, NormalizedMatch};
pub use strategy::ErrorStrategy;
