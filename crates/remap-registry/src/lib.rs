//! Registry loading for remap.
//!
//! Parses raw per-version identifier data into ordered, immutable
//! [`Registry`] values. Index assignment is positional: the output ordering
//! exactly preserves the raw input ordering, matching the runtime protocol
//! representation the translator indexes into.

pub mod error;
pub mod loader;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use loader::{from_indexed_json, from_json, registry_from_value, LoaderOptions, VersionDocument};
pub use registry::{IdentifierRecord, Registry};
