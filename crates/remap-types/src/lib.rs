//! Foundation types for remap.
//!
//! This crate provides the core identifier, table, and document types used
//! throughout the mapping generator. Every other remap crate depends on
//! `remap-types`.
//!
//! # Key Types
//!
//! - [`ProtocolVersion`] — A protocol version label ("1.19.4", "23w31a")
//! - [`Category`] — A registry category name ("blockstates", "items")
//! - [`CategoryTable`] — Dense source→target index mapping for one category
//! - [`MappingDocument`] — All category tables plus metadata for one
//!   version-pair generation run

pub mod category;
pub mod document;
pub mod table;
pub mod version;

pub use category::Category;
pub use document::{DocumentMeta, MappingDocument};
pub use table::{CategoryTable, TableStats, UNMAPPED_WIRE};
pub use version::ProtocolVersion;
