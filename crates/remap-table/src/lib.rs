//! Mapping table builder for remap.
//!
//! Runs the reconciliation engine once per configured category
//! (independently, on worker threads) and aggregates every per-category
//! table plus run metadata into one composite [`MappingDocument`].
//!
//! [`MappingDocument`]: remap_types::MappingDocument

pub mod builder;
pub mod config;
pub mod error;

pub use builder::{build, collect_stubs, RegistryPair};
pub use config::{BuildConfig, CategoryConfig};
pub use error::{BuildError, BuildResult, FallbackViolation};
